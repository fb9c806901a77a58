use crate::{Page, RelayEdge};

/// Common trait for Relay connections. Will be implemented by the codegen.
pub trait RelayConnection {
    /// The type of the Edge - this will be added for you in the codegen.
    type EdgeType: RelayEdge<NodeType = Self::NodeType>;

    /// The underlying type of Node we're Connection-ing. Will be filled in for you by the codegen.
    type NodeType;

    /// Builds the connection object from a page produced by the `ConnectionWindower`.
    fn from_page(page: Page<Self::NodeType>) -> Self;
}

#[cfg(test)]
mod tests {
    use crate::{ConnectionArgs, ConnectionWindower, Page, PageInfo, RelayConnection};
    use juniper::GraphQLObject;

    #[derive(Debug, GraphQLObject, RelayConnection, Clone, Eq, PartialEq)]
    pub struct User {
        name: String,
    }

    fn users(count: usize) -> Vec<User> {
        (0..count)
            .map(|idx| User {
                name: format!("User#{idx}"),
            })
            .collect()
    }

    #[test]
    fn connection_types_are_generated() {
        let conn = UserRelayConnection {
            total_count: 12,
            edges: vec![],
            page_info: PageInfo::default(),
        };

        assert_eq!(conn.total_count, 12);
        assert_eq!(conn.edges.len(), 0);
    }

    #[test]
    fn edge_types_are_generated() {
        let edge = UserRelayEdge {
            node: User {
                name: "Lune".to_owned(),
            },
            cursor: "some-string".to_owned(),
        };
        assert_eq!(edge.node.name, "Lune");
        assert_eq!(edge.cursor, "some-string");
    }

    #[test]
    fn connection_from_page() {
        let windower = ConnectionWindower::default();
        let page: Page<User> = windower
            .slice(users(5), &ConnectionArgs::first(2))
            .unwrap();
        let conn = UserRelayConnection::from_page(page);

        assert_eq!(conn.total_count, 5);
        assert_eq!(conn.edges.len(), 2);
        assert_eq!(conn.edges[1].node.name, "User#1");
        assert_eq!(conn.page_info.end_cursor.as_ref(), Some(&conn.edges[1].cursor));
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
    }
}
