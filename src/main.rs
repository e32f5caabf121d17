use anyhow::{Context, Result};
use eventgraph::graph::{EdgeEvent, EdgeType, EventGraph, NavigableGraph};
use eventgraph::{interval, persistence, GraphConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("EventGraph v{}", eventgraph::version());
    println!("==========================================");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => GraphConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => GraphConfig::default(),
    };
    info!("Using {} graph", config.kind);

    let graph = demo_load(&config)?;
    demo_sub_networks(&graph);
    demo_multi_resolution(&graph);
    demo_snapshot(&graph, &config)?;
    Ok(())
}

fn demo_load(config: &GraphConfig) -> Result<EventGraph<u32, u32, ()>> {
    println!("=== Demo 1: Bulk Load ===");
    let mut graph = config.build::<u32, u32, ()>();

    let u = EdgeType::Undirected;
    let d = EdgeType::Directed;
    let events = [
        (1, 0, 1, u),
        (2, 1, 2, u),
        (3, 0, 2, u),
        (4, 2, 1, u),
        (6, 3, 1, u),
        (6, 0, 4, d),
        (7, 0, 5, d),
        (8, 5, 1, d),
        (9, 6, 1, d),
        (10, 4, 3, d),
        (11, 2, 7, u),
        (12, 1, 5, u),
        (13, 2, 6, u),
        (14, 6, 4, u),
        (15, 7, 8, u),
        (16, 8, 3, u),
        (17, 5, 7, u),
        // Re-delivered event
        (4, 1, 2, u),
    ]
    .into_iter()
    .map(|(key, from, to, edge_type)| EdgeEvent::between(key, from, to).typed(edge_type));

    let summary = graph.add_events(events)?;
    println!(
        "✓ Loaded {} events: {} edges, {} duplicates",
        summary.total(),
        summary.inserted,
        summary.duplicates
    );
    println!(
        "✓ {} vertices, {} edges, keys {:?}..={:?}",
        graph.vertex_count(),
        graph.edge_count(),
        graph.first_key(),
        graph.last_key()
    );
    println!();
    Ok(graph)
}

fn demo_sub_networks(graph: &EventGraph<u32, u32, ()>) {
    println!("=== Demo 2: Sub-networks ===");
    let views = [
        ("sub_network(2, 7)", graph.sub_network(2, 7)),
        ("head_network(5)", graph.head_network(5)),
        ("tail_network(5)", graph.tail_network(5)),
        ("tail_network(5).sub_network(0, 12)", graph.tail_network(5).sub_network(0, 12)),
    ];
    for (label, view) in &views {
        println!(
            "✓ {:<36} {:>2} edges, {:>2} vertices, bounds {:?}",
            label,
            view.edge_count(),
            view.vertex_count(),
            view.bounds()
        );
    }
    println!();
}

fn demo_multi_resolution(graph: &EventGraph<u32, u32, ()>) {
    println!("=== Demo 3: Multi-resolution bins ===");
    for level in interval::exponential_bins(graph, 1) {
        let counts: Vec<usize> = level.bins.iter().map(|(_, view)| view.edge_count()).collect();
        println!("✓ width {:>2}: {:?}", level.width, counts);
    }
    println!();
}

fn demo_snapshot(graph: &EventGraph<u32, u32, ()>, config: &GraphConfig) -> Result<()> {
    println!("=== Demo 4: Snapshot ===");
    let bytes = persistence::encode(graph, &config.snapshot)?;
    let restored: EventGraph<u32, u32, ()> = persistence::decode(&bytes)?;
    println!(
        "✓ {} bytes, restored {} vertices and {} edges",
        bytes.len(),
        restored.vertex_count(),
        restored.edge_count()
    );
    Ok(())
}
