use crate::storefront::schema::{Connection, Edge};

/// Strip pagination from a list of edges, keeping non-null nodes in order.
///
/// Null edges and edges with a null node are dropped; an absent list yields
/// an empty one.
pub fn filter_edges<T>(edges: Option<Vec<Option<Edge<T>>>>) -> Vec<T> {
    edges
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|edge| edge.node)
        .collect()
}

impl<T> Connection<T> {
    /// Nodes of this connection, cursors and page info discarded.
    pub fn into_nodes(self) -> Vec<T> {
        filter_edges(self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge<T>(node: Option<T>) -> Option<Edge<T>> {
        Some(Edge {
            cursor: Some("c".into()),
            node,
        })
    }

    #[test]
    fn drops_null_edges_and_keeps_order() {
        let edges = vec![edge(Some("X")), None, edge(Some("Y"))];
        assert_eq!(filter_edges(Some(edges)), vec!["X", "Y"]);
    }

    #[test]
    fn drops_null_nodes() {
        let edges = vec![edge(None), edge(Some(2)), edge(None), edge(Some(1))];
        assert_eq!(filter_edges(Some(edges)), vec![2, 1]);
    }

    #[test]
    fn absent_and_empty_inputs_yield_empty() {
        assert!(filter_edges::<u8>(None).is_empty());
        assert!(filter_edges::<u8>(Some(Vec::new())).is_empty());
        assert!(filter_edges::<u8>(Some(vec![None, edge(None)])).is_empty());
    }

    #[test]
    fn connection_into_nodes_ignores_page_info() {
        let conn = Connection {
            page_info: None,
            edges: Some(vec![edge(Some("a")), None]),
        };
        assert_eq!(conn.into_nodes(), vec!["a"]);
    }
}
