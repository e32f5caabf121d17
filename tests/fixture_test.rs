//! Reference fixture: 17 events over 9 vertices, run against every strategy

use eventgraph::graph::{
    DyadGraph, EdgeEvent, EdgeType, FlatGraph, GraphError, GraphSettings, NavigableGraph,
    VertexGraph,
};

const U: EdgeType = EdgeType::Undirected;
const D: EdgeType = EdgeType::Directed;

const EVENTS: [(i32, u32, u32, EdgeType); 17] = [
    (1, 0, 1, U),
    (2, 1, 2, U),
    (3, 0, 2, U),
    (4, 2, 1, U),
    (6, 3, 1, U),
    (6, 0, 4, D),
    (7, 0, 5, D),
    (8, 5, 1, D),
    (9, 6, 1, D),
    (10, 4, 3, D),
    (11, 2, 7, U),
    (12, 1, 5, U),
    (13, 2, 6, U),
    (14, 6, 4, U),
    (15, 7, 8, U),
    (16, 8, 3, U),
    (17, 5, 7, U),
];

fn load<G: NavigableGraph<Key = i32, Vertex = u32, Value = ()>>(mut graph: G) -> G {
    for (key, from, to, edge_type) in EVENTS {
        assert!(graph.add_edge_typed(key, from, to, edge_type).unwrap());
    }
    graph
}

macro_rules! fixture_tests {
    ($name:ident, $graph:ty) => {
        mod $name {
            use super::*;

            fn fixture() -> $graph {
                load(<$graph>::new(GraphSettings::default()))
            }

            #[test]
            fn test_full_graph() {
                let g = fixture();
                assert_eq!(g.edge_count(), 17);
                assert_eq!(g.vertex_count(), 9);
                assert_eq!(g.edges().len(), 17);
                assert_eq!(g.vertices().len(), 9);
                assert_eq!(g.first_key(), Some(1));
                assert_eq!(g.last_key(), Some(17));
                assert!(!g.is_bounded());

                assert_eq!(g.in_degree(&0), 2);
                assert_eq!(g.out_degree(&0), 4);
                assert_eq!(g.out_degree(&4), 2);
            }

            #[test]
            fn test_sub_network() {
                let g = fixture();
                let sub = g.sub_network(2, 7);
                assert_eq!(sub.edge_count(), 5);
                assert_eq!(sub.vertex_count(), 5);
                assert_eq!(sub.in_degree(&0), 1);
                assert_eq!(sub.out_degree(&0), 2);
                assert_eq!(sub.out_degree(&4), 0);
                assert_eq!(sub.lower_bound(), Some(&2));
                assert_eq!(sub.upper_bound(), Some(&7));
                assert_eq!(sub.earliest_key(), Some(2));
                assert_eq!(sub.latest_key(), Some(6));
            }

            #[test]
            fn test_tail_network() {
                let g = fixture();
                let tail = g.tail_network(5);
                assert_eq!(tail.edge_count(), 13);
                assert_eq!(tail.in_degree(&0), 0);
                assert_eq!(tail.out_degree(&0), 2);
                assert_eq!(tail.out_degree(&4), 2);
                assert_eq!(tail.first_key(), Some(5));
                assert_eq!(tail.last_key(), Some(17));
            }

            #[test]
            fn test_head_network() {
                let g = fixture();
                let head = g.head_network(5);
                assert_eq!(head.edge_count(), 4);
                assert_eq!(head.in_degree(&0), 2);
                assert_eq!(head.out_degree(&0), 2);
                assert_eq!(head.out_degree(&4), 0);
                assert_eq!(head.first_key(), Some(1));
                assert_eq!(head.last_key(), Some(5));
            }

            #[test]
            fn test_chained_views_intersect() {
                let g = fixture();
                let nested = g.tail_network(5).sub_network(0, 12);
                assert_eq!(nested.lower_bound(), Some(&5));
                assert_eq!(nested.upper_bound(), Some(&12));
                assert_eq!(nested.edge_count(), g.sub_network(5, 12).edge_count());
                assert_eq!(nested.edge_count(), 7);

                let empty = g.sub_network(20, 30);
                assert_eq!(empty.edge_count(), 0);
                assert_eq!(empty.vertex_count(), 0);
                assert_eq!(empty.first_key(), Some(20));
                assert_eq!(empty.last_key(), Some(30));
                assert_eq!(empty.earliest_key(), None);
            }

            #[test]
            fn test_remove_vertex() {
                let mut g = fixture();
                for vertex in [8, 4, 1] {
                    let edges = g.edge_count();
                    let vertices = g.vertex_count();
                    let incident = g.degree(&vertex);

                    assert!(g.remove_vertex(&vertex).unwrap());
                    assert_eq!(g.edge_count(), edges - incident);
                    assert_eq!(g.vertex_count(), vertices - 1);
                    assert!(!g.contains_vertex(&vertex));
                }
                assert!(!g.remove_vertex(&8).unwrap());
            }

            #[test]
            fn test_highest_degree_vertex() {
                let mut g = fixture();
                assert_eq!(g.degree(&1), 7);
                assert!(g.remove_vertex(&1).unwrap());
                assert_eq!(g.edge_count(), 10);
                assert_eq!(g.vertex_count(), 8);
            }

            #[test]
            fn test_missing_endpoint_rejected() {
                let mut g = fixture();
                let err = g.add_event(EdgeEvent::new(20, Some(0), None)).unwrap_err();
                assert!(matches!(err, GraphError::InvalidEndpoint(_)));
                let err = g.add_event(EdgeEvent::new(20, None, Some(0))).unwrap_err();
                assert!(matches!(err, GraphError::InvalidEndpoint(_)));
                assert_eq!(g.edge_count(), 17);
            }

            #[test]
            fn test_duplicate_insertion() {
                let mut g = fixture();
                assert!(!g.add_edge_typed(6, 0, 4, D).unwrap());
                assert!(!g.add_edge_typed(4, 1, 2, U).unwrap());
                assert_eq!(g.edge_count(), 17);

                // Same pair and key, other type
                assert!(g.add_edge_typed(6, 0, 4, U).unwrap());
                assert_eq!(g.edge_count(), 18);
            }

            #[test]
            fn test_clear() {
                let mut g = fixture();
                g.clear().unwrap();
                assert_eq!(g.edge_count(), 0);
                assert_eq!(g.vertex_count(), 0);
                assert_eq!(g.first_key(), None);
            }

            #[test]
            fn test_in_out_incident_consistency() {
                let g = fixture();
                for view in [g.sub_network(0, 100), g.sub_network(3, 11), g.tail_network(9)] {
                    for v in view.vertices() {
                        let incident = view.incident_edges(&v);
                        let ins = view.in_edges(&v);
                        let outs = view.out_edges(&v);
                        assert!(ins.iter().all(|e| incident.contains(e)));
                        assert!(outs.iter().all(|e| incident.contains(e)));
                        for e in ins.iter().filter(|e| outs.contains(e)) {
                            assert!(e.edge_type == U || e.is_loop());
                        }
                    }
                }
            }

            #[test]
            fn test_neighbors_and_pairs() {
                let g = fixture();
                let mut neighbors = g.neighbors(&1);
                neighbors.sort();
                assert_eq!(neighbors, vec![0, 2, 3, 5, 6]);

                let mut preds = g.predecessors(&1);
                preds.sort();
                assert_eq!(preds, vec![0, 2, 3, 5, 6]);

                let mut succs = g.successors(&0);
                succs.sort();
                assert_eq!(succs, vec![1, 2, 4, 5]);

                assert!(g.is_predecessor(&0, &4));
                assert!(!g.is_predecessor(&4, &0));
                assert!(g.is_successor(&4, &0));
                assert!(g.is_neighbor(&4, &0));

                // Pairs {1, 2} and {1, 5} each carry two edges
                assert_eq!(g.pairs().len(), 15);
                assert_eq!(g.sub_network(2, 7).pairs().len(), 4);
            }

            #[test]
            fn test_find_edge_set() {
                let g = fixture();
                assert_eq!(g.find_edge_set(&1, &2).len(), 2);
                assert_eq!(g.find_edge_set(&2, &1).len(), 2);
                assert_eq!(g.find_edge_set(&0, &4).len(), 1);
                assert!(g.find_edge_set(&4, &0).is_empty());
                assert!(g.find_edge(&4, &0).is_none());
            }

            #[test]
            fn test_edge_lookups() {
                let g = fixture();
                let directed = g.find_edge(&0, &4).unwrap();
                assert_eq!(g.source(&directed), Some(0));
                assert_eq!(g.dest(&directed), Some(4));
                assert!(g.is_source(&0, &directed));
                assert!(g.is_dest(&4, &directed));
                assert_eq!(g.opposite(&4, &directed).unwrap(), 0);
                assert!(matches!(
                    g.opposite(&7, &directed),
                    Err(GraphError::NotIncident { .. })
                ));
                assert_eq!(g.incident_count(&directed), 2);

                let undirected = g.find_edge(&0, &1).unwrap();
                assert_eq!(g.edge_type(&undirected), Some(U));
                assert_eq!(g.source(&undirected), None);
                assert_eq!(g.endpoints(&undirected), Some((0, 1)));

                assert!(g.is_incident(&0, &directed).unwrap());
                assert!(!g.is_incident(&1, &directed).unwrap());
                assert!(matches!(
                    g.is_incident(&42, &directed),
                    Err(GraphError::VertexNotPresent(_))
                ));

                // Known to the parent, filtered out of the view
                let view = g.sub_network(10, 20);
                assert!(!view.contains_edge(&directed));
                assert_eq!(view.endpoints(&directed), Some((0, 4)));
                assert_eq!(view.edge_type(&directed), Some(D));
                assert_eq!(view.source(&directed), Some(0));
                assert_eq!(view.dest(&directed), Some(4));
                assert!(view.is_source(&0, &directed));
                assert_eq!(view.edge_type(&undirected), Some(U));
                assert_eq!(view.source(&undirected), None);
                assert!(matches!(
                    view.is_incident(&3, &directed),
                    Err(GraphError::VertexNotPresent(_))
                        | Err(GraphError::EdgeNotPresent(_))
                ));
            }

            #[test]
            fn test_first_and_last_edge() {
                let g = fixture();
                assert_eq!(g.first_edge().map(|e| e.key), Some(1));
                assert_eq!(g.last_edge().map(|e| e.key), Some(17));
                assert_eq!(g.sub_network(2, 7).last_edge().map(|e| e.key), Some(6));
            }

            #[test]
            fn test_edges_of_type() {
                let g = fixture();
                assert_eq!(g.edge_count_of_type(D), 5);
                assert_eq!(g.edge_count_of_type(U), 12);
                assert_eq!(g.tail_network(10).edge_count_of_type(D), 1);
            }

            #[test]
            fn test_views_are_read_only() {
                let g = fixture();
                let mut view = g.sub_network(2, 7);
                assert_eq!(view.add_edge(3, 0, 1), Err(GraphError::ReadOnlyView));
                assert_eq!(view.add_vertex(99), Err(GraphError::ReadOnlyView));
                assert_eq!(view.remove_vertex(&0), Err(GraphError::ReadOnlyView));
                assert_eq!(view.edge_count(), 5);
            }

            #[test]
            fn test_parent_writes_do_not_reach_views() {
                let mut g = fixture();
                let view = g.tail_network(0);
                g.add_edge_typed(18, 0, 8, D).unwrap();
                g.remove_vertex(&1).unwrap();

                assert_eq!(view.edge_count(), 17);
                assert_eq!(view.vertex_count(), 9);
                assert_eq!(g.edge_count(), 11);
            }
        }
    };
}

fixture_tests!(dyad, DyadGraph<i32, u32, ()>);
fixture_tests!(vertex, VertexGraph<i32, u32, ()>);
fixture_tests!(flat, FlatGraph<i32, u32, ()>);
