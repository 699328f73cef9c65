use std::io::Read;
use std::str::FromStr;

use displaydoc::Display;
use maxflow::{EdgeSpec, VertexId};

pub type Capacity = i64;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum InputError {
    /// unexpected end of input while reading {0}
    UnexpectedEof(&'static str),
    /// invalid {what} `{token}`
    InvalidToken { what: &'static str, token: String },
    /// capacity {0} does not fit in 32 bits
    CapacityOutOfRange(Capacity),
    /// vertex count {0} exceeds the limit of 65535
    OrderOutOfRange(usize),
    /// malformed csv input: {0}
    Csv(String),
}

impl std::error::Error for InputError {}

impl From<csv::Error> for InputError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// One max-flow instance as read from input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub order: usize,
    pub source: VertexId,
    pub sink: VertexId,
    pub edges: Vec<EdgeSpec<Capacity>>,
}

// Negative capacities are passed through so that the solver reports them.
fn check_capacity(capacity: Capacity) -> Result<Capacity, InputError> {
    if capacity > Capacity::from(u32::MAX) {
        Err(InputError::CapacityOutOfRange(capacity))
    } else {
        Ok(capacity)
    }
}

/// Largest accepted vertex count.
const MAX_ORDER: usize = u16::MAX as usize;

fn check_order(order: usize) -> Result<usize, InputError> {
    if order > MAX_ORDER {
        Err(InputError::OrderOutOfRange(order))
    } else {
        Ok(order)
    }
}

fn next<'a, T, I>(tokens: &mut I, what: &'static str) -> Result<T, InputError>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let token = tokens.next().ok_or(InputError::UnexpectedEof(what))?;
    token.parse().map_err(|_| InputError::InvalidToken {
        what,
        token: token.to_string(),
    })
}

/// Parses the whitespace separated batch format: a problem count, then for every problem
/// `order size source sink` followed by `size` edge triples `tail head capacity`.
pub fn parse_batch(text: &str) -> Result<Vec<Problem>, InputError> {
    let mut tokens = text.split_whitespace();
    let count: usize = next(&mut tokens, "problem count")?;

    (0..count)
        .map(|_| -> Result<Problem, InputError> {
            let order = check_order(next(&mut tokens, "vertex count")?)?;
            let size: usize = next(&mut tokens, "edge count")?;
            let source = next(&mut tokens, "source")?;
            let sink = next(&mut tokens, "sink")?;

            let edges = (0..size)
                .map(|_| -> Result<EdgeSpec<Capacity>, InputError> {
                    Ok(EdgeSpec {
                        tail: next(&mut tokens, "edge tail")?,
                        head: next(&mut tokens, "edge head")?,
                        capacity: check_capacity(next(&mut tokens, "edge capacity")?)?,
                    })
                })
                .collect::<Result<Vec<_>, InputError>>()?;

            Ok(Problem {
                order,
                source,
                sink,
                edges,
            })
        })
        .collect()
}

/// Reads a `tail,head,capacity` csv edge list.
///
/// Without an explicit `order` the graph is sized to the largest vertex id mentioned.
pub fn read_csv<R: Read>(
    reader: R,
    source: VertexId,
    sink: VertexId,
    order: Option<usize>,
) -> Result<Problem, InputError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let edges = rdr
        .deserialize::<EdgeSpec<Capacity>>()
        .map(|row| -> Result<EdgeSpec<Capacity>, InputError> {
            let edge = row?;
            check_capacity(edge.capacity)?;
            Ok(edge)
        })
        .collect::<Result<Vec<_>, InputError>>()?;

    let order = order.unwrap_or_else(|| {
        edges
            .iter()
            .flat_map(|e| [e.tail, e.head])
            .chain([source, sink])
            .max()
            .unwrap_or(0)
    });
    check_order(order)?;

    Ok(Problem {
        order,
        source,
        sink,
        edges,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_batch_problems() {
        let text = "2\n2 1 1 2\n1 2 5\n\n3 2 1 3\n1 2 10\n2 3 2\n";
        let problems = parse_batch(text).unwrap();
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].order, 2);
        assert_eq!(
            problems[0].edges,
            vec![EdgeSpec {
                tail: 1,
                head: 2,
                capacity: 5
            }]
        );
        assert_eq!(problems[1].sink, 3);
        assert_eq!(problems[1].edges.len(), 2);
    }

    #[test]
    fn negative_capacity_is_passed_through() {
        let problems = parse_batch("1 2 1 1 2 1 2 -4").unwrap();
        assert_eq!(problems[0].edges[0].capacity, -4);
    }

    #[rstest]
    #[case("", InputError::UnexpectedEof("problem count"))]
    #[case("1 3 1 1", InputError::UnexpectedEof("sink"))]
    #[case("1 3 1 1 3 1 2", InputError::UnexpectedEof("edge capacity"))]
    #[case(
        "1 x",
        InputError::InvalidToken { what: "vertex count", token: "x".to_string() }
    )]
    #[case("1 2 1 1 2 1 2 4294967296", InputError::CapacityOutOfRange(4_294_967_296))]
    #[case("1 18446744073709551615 0 1 2", InputError::OrderOutOfRange(usize::MAX))]
    #[case("1 65536 0 1 2", InputError::OrderOutOfRange(65_536))]
    fn rejects_malformed_batch(#[case] text: &str, #[case] expected: InputError) {
        assert_eq!(parse_batch(text), Err(expected));
    }

    #[test]
    fn reads_csv_and_infers_order() {
        let data = "tail,head,capacity\n1, 2, 3\n2, 5, 1\n";
        let problem = read_csv(data.as_bytes(), 1, 5, None).unwrap();
        assert_eq!(problem.order, 5);
        assert_eq!(problem.edges.len(), 2);
        assert_eq!(problem.edges[1].head, 5);

        let problem = read_csv(data.as_bytes(), 1, 5, Some(7)).unwrap();
        assert_eq!(problem.order, 7);
    }

    #[rstest]
    #[case(Some(70_000), 70_000)]
    #[case(None, 100_000)]
    fn csv_order_is_bounded(#[case] order: Option<usize>, #[case] rejected: usize) {
        let data = "tail,head,capacity\n1,100000,3\n";
        assert_eq!(
            read_csv(data.as_bytes(), 1, 2, order),
            Err(InputError::OrderOutOfRange(rejected))
        );
    }

    #[test]
    fn rejects_malformed_csv() {
        let data = "tail,head,capacity\n1,2,lots\n";
        assert!(matches!(
            read_csv(data.as_bytes(), 1, 2, None),
            Err(InputError::Csv(_))
        ));
    }
}
