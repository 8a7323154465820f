use erdrank::graph::{AssociationKind, EdgeId, Graph, NodeId};
use erdrank::rank::{RankEngine, Ranking};
use erdrank::rank::cycles::is_acyclic;
use erdrank::rank::ordering::count_crossings;
use erdrank::serializer::{self, OutputFormat};

fn rank(names: &[&str], edges: &[(&str, &str)]) -> (Graph, Ranking) {
    let mut g = Graph::new();
    for name in names {
        g.add_node(*name);
    }
    for (s, t) in edges {
        let (s, t) = (g.find(s).unwrap(), g.find(t).unwrap());
        g.add_edge(s, t, AssociationKind::NonIdentifying);
    }
    let ranking = RankEngine::default().rank(&mut g);
    (g, ranking)
}

fn level(ranking: &Ranking, entity: &str) -> u32 {
    ranking.placement(entity).unwrap().level
}

#[test]
fn linear_chain() {
    let (_, ranking) = rank(&["T1", "T2", "T3"], &[("T1", "T2"), ("T2", "T3")]);
    assert_eq!(level(&ranking, "T3"), 1);
    assert_eq!(level(&ranking, "T2"), 2);
    assert_eq!(level(&ranking, "T1"), 3);
    assert_eq!(ranking.depth, 3);
}

#[test]
fn diamond() {
    let (_, ranking) = rank(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
    );
    assert_eq!(level(&ranking, "D"), 1);
    assert_eq!(level(&ranking, "B"), 2);
    assert_eq!(level(&ranking, "C"), 2);
    assert_eq!(level(&ranking, "A"), 3);
    assert_eq!(ranking.rows()[1], vec!["B", "C"]);
}

#[test]
fn two_cycle() {
    let (g, ranking) = rank(&["A", "B"], &[("A", "B"), ("B", "A")]);
    assert_eq!(ranking.reversed_edges.len(), 1);
    assert_eq!(g.edges().iter().filter(|e| e.reversed).count(), 1);
    assert!(is_acyclic(&g));

    let mut levels = vec![level(&ranking, "A"), level(&ranking, "B")];
    levels.sort();
    assert_eq!(levels, vec![1, 2]);
}

#[test]
fn wide_level() {
    let mut g = Graph::new();
    for name in ["A", "B", "C", "D", "E"] {
        g.add_node(name);
    }
    let ranking = RankEngine::default().with_sweeps(1).rank(&mut g);

    assert!(ranking.placements.iter().all(|p| p.level == 1));
    let mut orders: Vec<u32> = ranking.placements.iter().map(|p| p.order).collect();
    orders.sort();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);
}

#[test]
fn single_node() {
    let (_, ranking) = rank(&["Only"], &[]);
    assert_eq!(ranking.depth, 1);
    assert_eq!(ranking.placements[0].level, 1);
    assert_eq!(ranking.placements[0].order, 1);
}

#[test]
fn empty_graph() {
    let (_, ranking) = rank(&[], &[]);
    assert_eq!(ranking.depth, 0);
    assert!(ranking.placements.is_empty());
}

#[test]
fn self_loop_is_reported_but_ignored() {
    let (g, ranking) = rank(&["Employee"], &[("Employee", "Employee")]);
    assert_eq!(ranking.depth, 1);
    assert_eq!(ranking.reversed_edges, vec![EdgeId(0)]);
    let edge = g.edge(EdgeId(0));
    assert_eq!((edge.source, edge.target), (NodeId(0), NodeId(0)));
}

#[test]
fn crossing_is_removed() {
    let (g, ranking) = rank(&["C1", "C2", "P1", "P2"], &[("P1", "C2"), ("P2", "C1")]);
    assert_eq!(count_crossings(&g), 0);
    assert_eq!(ranking.sweeps_run, 5);
}

#[test]
fn shop_schema_end_to_end() {
    let source = r#"
        # a small shop
        entity Customer { id int pk }
        entity Product { id int pk }
        entity Order {
            id int pk
            customer_id int fk -> Customer.id
        }
        entity OrderItem {
            order_id int pk fk -> Order.id
            product_id int fk -> Product.id
        }
        entity Employee {
            id int pk
            manager_id int fk -> Employee.id
        }
        entity Manager
        rel {
            Manager -> Employee : inheritance
        }
        view sales {
            include Customer, Order, OrderItem
        }
    "#;

    let ranking = erdrank::arrange(source, None, &RankEngine::default()).unwrap();
    assert_eq!(ranking.depth, 3);
    assert_eq!(level(&ranking, "Customer"), 1);
    assert_eq!(level(&ranking, "Product"), 1);
    assert_eq!(level(&ranking, "Order"), 2);
    assert_eq!(level(&ranking, "OrderItem"), 3);
    assert_eq!(level(&ranking, "Employee"), 1);
    assert_eq!(level(&ranking, "Manager"), 2);
    assert_eq!(ranking.reversed_edges.len(), 1);

    let out = serializer::serialize(&ranking, OutputFormat::Arrangement).unwrap();
    for entity in ["Customer", "Product", "Order", "OrderItem", "Employee", "Manager"] {
        assert_eq!(out.split_whitespace().filter(|w| w.trim_end_matches(';') == entity).count(), 1);
    }

    let sales = erdrank::arrange(source, Some("sales"), &RankEngine::default()).unwrap();
    assert_eq!(sales.rows(), vec![vec!["Customer"], vec!["Order"], vec!["OrderItem"]]);
}

#[test]
fn cyclic_schema_still_layers() {
    let source = r#"
        entity Department { head_id int fk -> Employee.id }
        entity Employee { dept_id int fk -> Department.id }
        entity Project { dept_id int fk -> Department.id }
    "#;
    let ranking = erdrank::arrange(source, None, &RankEngine::default()).unwrap();
    assert_eq!(ranking.reversed_edges.len(), 1);
    assert_eq!(ranking.depth, 3);
    assert_eq!(ranking.placements.len(), 3);

    // The association closing the cycle is reported by entity name, in the
    // direction it was declared.
    let flipped: Vec<_> = ranking.reversed().collect();
    assert_eq!(flipped.len(), 1);
    assert_eq!((flipped[0].source.as_str(), flipped[0].target.as_str()), ("Employee", "Department"));
    assert_eq!(flipped[0].kind, AssociationKind::NonIdentifying);
    assert_eq!(ranking.edges.len(), 3);
    assert_eq!(&ranking.edges[ranking.reversed_edges[0].0], flipped[0]);

    let json = serializer::serialize(&ranking, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let reversed: Vec<&serde_json::Value> = value["edges"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["reversed"] == true)
        .collect();
    assert_eq!(reversed.len(), 1);
    assert_eq!(reversed[0]["source"], "Employee");
    assert_eq!(reversed[0]["target"], "Department");

    let table = serializer::serialize(&ranking, OutputFormat::Table).unwrap();
    assert!(table.ends_with("reversed: Employee -> Department (non_identifying)\n"));
}

#[test]
fn labels_reach_the_output() {
    let source = r#"
        entity Employee
        rel { Employee -> Employee : "reports to" }
    "#;
    let ranking = erdrank::arrange(source, None, &RankEngine::default()).unwrap();
    assert_eq!(ranking.edges.len(), 1);
    assert_eq!(ranking.edges[0].label.as_deref(), Some("reports to"));
    assert!(ranking.edges[0].reversed);

    let table = serializer::serialize(&ranking, OutputFormat::Table).unwrap();
    assert!(table.contains("reversed: Employee -> Employee (non_identifying) \"reports to\""));
}
