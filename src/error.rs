use displaydoc::Display;

use crate::vertex::VertexId;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Error {
    /// Invalid vertex id {id}, expected a value in 1..={order}
    InvalidVertexId { id: VertexId, order: usize },
    /// Invalid capacity, expected a non-negative value
    NegativeCapacity,
    /// Invalid query where source and sink are the same vertex ({0})
    DegenerateQuery(VertexId),
    /// Arithmetic overflow while accumulating capacity or flow
    ArithmeticOverflow,
}
