use serde::Serialize;

/// Identifies a node bound into a [`SyntaxTree`].
///
/// Ids are allocated only when a node is placed into the tree, so every id
/// that ever exists is reachable through the tree; there is no id pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Provenance flags recorded on syntax nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: NodeFlags = NodeFlags(0);
    /// The dash node came from a run of more than two dashes.
    pub const MORE_THAN_TWO_DASHES: NodeFlags = NodeFlags(1 << 0);
    /// The separator came from a run of more than one equals sign.
    pub const MORE_THAN_ONE_EQUALS: NodeFlags = NodeFlags(1 << 1);
    /// The flag or value node was narrowed from an unflagged text token.
    pub const NARROWED_FROM_UNFLAGGED_TEXT: NodeFlags = NodeFlags(1 << 2);
    /// The argument was closed forcefully because the input ended mid-argument.
    pub const FORCE_CREATED: NodeFlags = NodeFlags(1 << 3);

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: NodeFlags) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for NodeFlags {
    type Output = NodeFlags;

    fn bitor(self, rhs: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | rhs.0)
    }
}

/// The tagged union of syntax node shapes.
///
/// An `Argument` owns its children by id; children point back at their
/// owning argument through [`Node::parent`], so the bidirectional graph is
/// expressed with indices instead of reference cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    Dash {
        single_dash: bool,
        double_dash: bool,
    },
    Flag {
        text: String,
    },
    Value {
        text: String,
    },
    Separator,
    Argument {
        dash: NodeId,
        flag: NodeId,
        separator: Option<NodeId>,
        value: Option<NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub flags: NodeFlags,
    pub kind: NodeKind,
}

/// A dash node waiting to be bound into an argument.
#[derive(Debug, Clone, Default)]
pub(crate) struct DashDraft {
    pub single_dash: bool,
    pub double_dash: bool,
    pub flags: NodeFlags,
}

/// A flag or value node waiting to be bound into an argument.
#[derive(Debug, Clone)]
pub(crate) struct TextDraft {
    pub text: String,
    pub flags: NodeFlags,
}

/// A separator node waiting to be bound into an argument.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeparatorDraft {
    pub flags: NodeFlags,
}

/// The root of a parse: an arena of nodes plus the ordered argument list.
///
/// Arguments appear in the order their opening dash occurred in the input.
#[derive(Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    arguments: Vec<NodeId>,
}

impl SyntaxTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, flags: NodeFlags, kind: NodeKind) -> NodeId {
        // Id exhaustion is a programming error, not a malformed-input case.
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "syntax tree node id space exhausted"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            parent: None,
            flags,
            kind,
        });
        id
    }

    /// Binds a completed argument into the tree, allocating ids for the
    /// argument and its children. A separator and value are attached only
    /// when both are present, so the separator-iff-value invariant holds by
    /// construction.
    pub(crate) fn push_argument(
        &mut self,
        dash: DashDraft,
        flag: TextDraft,
        separator: Option<SeparatorDraft>,
        value: Option<TextDraft>,
        argument_flags: NodeFlags,
    ) -> NodeId {
        debug_assert!(!flag.text.is_empty(), "flag nodes must carry text");
        debug_assert!(
            !(dash.single_dash && value.is_some()),
            "single-dash arguments never carry a value"
        );

        let dash_id = self.alloc(
            dash.flags,
            NodeKind::Dash {
                single_dash: dash.single_dash,
                double_dash: dash.double_dash,
            },
        );
        let flag_id = self.alloc(flag.flags, NodeKind::Flag { text: flag.text });

        let (separator_id, value_id) = match (separator, value) {
            (Some(separator), Some(value)) => {
                let separator_id = self.alloc(separator.flags, NodeKind::Separator);
                let value_id = self.alloc(value.flags, NodeKind::Value { text: value.text });
                (Some(separator_id), Some(value_id))
            }
            _ => (None, None),
        };

        let argument_id = self.alloc(
            argument_flags,
            NodeKind::Argument {
                dash: dash_id,
                flag: flag_id,
                separator: separator_id,
                value: value_id,
            },
        );

        for child_id in [Some(dash_id), Some(flag_id), separator_id, value_id]
            .into_iter()
            .flatten()
        {
            self.nodes[child_id.index()].parent = Some(argument_id);
        }

        self.arguments.push(argument_id);
        argument_id
    }

    /// Number of arguments bound into the tree.
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn find_node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id.index())
            .unwrap_or_else(|| panic!("dangling node id {:?} in syntax tree", id))
    }

    /// The arguments of the tree, in input order.
    pub fn arguments(&self) -> impl Iterator<Item = ArgumentRef<'_>> {
        self.arguments.iter().map(move |&id| ArgumentRef {
            tree: self,
            node: self.node(id),
        })
    }

    /// Walks every bound node depth-first: each argument, then its children.
    pub fn for_each_node(&self, mut callback: impl FnMut(&Node)) {
        for argument in self.arguments() {
            callback(argument.node);
            callback(argument.dash());
            callback(argument.flag());
            if let Some(separator) = argument.separator() {
                callback(separator);
            }
            if let Some(value) = argument.value() {
                callback(value);
            }
        }
    }
}

/// A borrowed view of one argument and its children.
#[derive(Clone, Copy)]
pub struct ArgumentRef<'t> {
    tree: &'t SyntaxTree,
    node: &'t Node,
}

impl<'t> ArgumentRef<'t> {
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    pub fn flags(&self) -> NodeFlags {
        self.node.flags
    }

    pub fn node(&self) -> &'t Node {
        self.node
    }

    fn parts(&self) -> (NodeId, NodeId, Option<NodeId>, Option<NodeId>) {
        match self.node.kind {
            NodeKind::Argument {
                dash,
                flag,
                separator,
                value,
            } => (dash, flag, separator, value),
            _ => unreachable!("argument list holds a non-argument node"),
        }
    }

    pub fn dash(&self) -> &'t Node {
        self.tree.node(self.parts().0)
    }

    pub fn flag(&self) -> &'t Node {
        self.tree.node(self.parts().1)
    }

    pub fn separator(&self) -> Option<&'t Node> {
        self.parts().2.map(|id| self.tree.node(id))
    }

    pub fn value(&self) -> Option<&'t Node> {
        self.parts().3.map(|id| self.tree.node(id))
    }

    pub fn is_single_dash(&self) -> bool {
        matches!(
            self.dash().kind,
            NodeKind::Dash {
                single_dash: true,
                ..
            }
        )
    }

    pub fn is_double_dash(&self) -> bool {
        matches!(
            self.dash().kind,
            NodeKind::Dash {
                double_dash: true,
                ..
            }
        )
    }

    pub fn flag_text(&self) -> &'t str {
        match &self.flag().kind {
            NodeKind::Flag { text } => text,
            _ => unreachable!("argument flag slot holds a non-flag node"),
        }
    }

    pub fn value_text(&self) -> Option<&'t str> {
        self.value().map(|node| match &node.kind {
            NodeKind::Value { text } => text.as_str(),
            _ => unreachable!("argument value slot holds a non-value node"),
        })
    }
}
