use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, one_of, satisfy},
    combinator::{all_consuming, recognize},
    sequence::{delimited, preceded},
    IResult,
};

/// Bare operators that never carry meaning on their own.
const OPERATORS: [&str; 22] = [
    "+",
    "-",
    "=",
    "\\cdot",
    "\\times",
    "\\div",
    "\\pm",
    "\\mp",
    "\\longleftarrow",
    "\\leftarrow",
    "\\rightarrow",
    "\\longrightarrow",
    "\\Longleftarrow",
    "\\Rightarrow",
    "\\Longrightarrow",
    "\\approx",
    "\\neq",
    "\\leq",
    "\\geq",
    "\\equiv",
    "\\sim",
    "\\propto",
];

/// `^{…}` / `_{…}` without nested braces, or `^x` / `_x` with one ASCII
/// alphanumeric.
fn bare_modifier(input: &str) -> IResult<&str, &str> {
    preceded(
        one_of("^_"),
        alt((
            delimited(char('{'), take_while(|c: char| c != '{' && c != '}'), char('}')),
            recognize(satisfy(|c: char| c.is_ascii_alphanumeric())),
        )),
    )(input)
}

/// True for symbols that are syntax rather than meaning: bare operators,
/// exponents and subscripts.
pub fn is_syntactic_glue(symbol: &str) -> bool {
    let symbol = symbol.trim();
    OPERATORS.contains(&symbol) || all_consuming(bare_modifier)(symbol).is_ok()
}
