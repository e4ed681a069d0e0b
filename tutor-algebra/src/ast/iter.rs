use super::Node;

/// An iterator that iteratively traverses an expression tree in left-to-right post-order (i.e.
/// depth-first).
///
/// This iterator is created by [`Node::post_order_iter`].
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
    last_visited: Option<&'a Node>,
}

impl<'a> NodeIter<'a> {
    /// Creates a new iterator that traverses the tree in left-to-right post-order.
    pub fn new(node: &'a Node) -> Self {
        Self {
            stack: vec![node],
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self) -> Option<&'a Node> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given node is the last visited node.
    fn is_last_visited(&self, node: &'a Node) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, node),
            None => false,
        }
    }

    /// Pushes the children of a node so that the leftmost child is visited first, unless its
    /// rightmost child was just visited, in which case the node itself is visited.
    fn descend(&mut self, children: &[&'a Node]) -> Option<Option<&'a Node>> {
        match children.last() {
            Some(last) if !self.is_last_visited(last) => {
                self.stack.extend(children.iter().rev());
                None
            },
            _ => Some(self.visit()),
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = *self.stack.last()?;
            let visited = match node {
                Node::Integer(_) | Node::Variable(_) => return self.visit(),
                Node::Product(factors) => {
                    let children = factors.iter().collect::<Vec<_>>();
                    self.descend(&children)
                },
                Node::Sqrt(radicand) => self.descend(&[radicand.as_ref()]),
                Node::Power(lhs, rhs)
                | Node::Fraction(lhs, rhs)
                | Node::BinaryOp(_, lhs, rhs)
                | Node::RangeQuery(lhs, rhs) => self.descend(&[lhs.as_ref(), rhs.as_ref()]),
            };

            if let Some(visited) = visited {
                return visited;
            }
        }
    }
}
