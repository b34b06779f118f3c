/// Turn notation parser for scripted sequences such as `x[-1] y[0.5]' z[1]2`
use nom::{
    character::complete::{char, multispace0, one_of},
    combinator::opt,
    number::complete::double,
    sequence::{delimited, tuple},
    IResult,
};

use crate::action::{Action, QUARTER_TURN};
use crate::error::PuzzleError;
use crate::mask::Axis;

/// Parse a whitespace-separated turn script
pub fn parse_script(input: &str) -> Result<Vec<Action>, PuzzleError> {
    let mut turns = Vec::new();
    let mut rest = input;

    loop {
        let (after_space, _) = space(rest)?;
        if after_space.is_empty() {
            break;
        }
        let (after_turn, action) = parse_turn(after_space).map_err(|e| notation_error(after_space, e))?;
        if after_turn.starts_with(|c: char| !c.is_whitespace()) {
            return Err(PuzzleError::Notation {
                fragment: fragment(after_turn).to_string(),
                message: "turns must be separated by whitespace".to_string(),
            });
        }
        turns.push(action);
        rest = after_turn;
    }

    Ok(turns)
}

/// Parse a single turn token
pub fn parse_turn(input: &str) -> IResult<&str, Action> {
    let (input, (axis, layer, modifier)) = tuple((
        one_of("xyzXYZ"),
        delimited(char('['), double, char(']')),
        opt(one_of("'2")),
    ))(input)?;

    let axis = match axis.to_ascii_lowercase() {
        'x' => Axis::X,
        'y' => Axis::Y,
        _ => Axis::Z,
    };
    let angle = match modifier {
        Some('\'') => -QUARTER_TURN,
        Some(_) => 2.0 * QUARTER_TURN,
        None => QUARTER_TURN,
    };

    Ok((input, Action::layer_turn(axis, layer, angle)))
}

fn space(input: &str) -> Result<(&str, &str), PuzzleError> {
    multispace0::<&str, nom::error::Error<&str>>(input)
        .map_err(|e| notation_error(input, e))
}

fn fragment(input: &str) -> &str {
    input.split_whitespace().next().unwrap_or(input)
}

fn notation_error(token: &str, err: nom::Err<nom::error::Error<&str>>) -> PuzzleError {
    let message = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => format!("unexpected input ({:?})", e.code),
        nom::Err::Incomplete(_) => "incomplete turn".to_string(),
    };
    PuzzleError::Notation {
        fragment: fragment(token).to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    #[test]
    fn test_parse_single_turns() {
        let (_, turn) = parse_turn("x[-1]").unwrap();
        assert_eq!(turn, Action::layer_turn(Axis::X, -1.0, QUARTER_TURN));

        let (_, turn) = parse_turn("Y[0.5]'").unwrap();
        assert_eq!(turn.angle(), -QUARTER_TURN);
        assert_eq!(turn.place(), Vector3::new(0.0, 0.5, 0.0));

        let (_, turn) = parse_turn("z[1]2").unwrap();
        assert_eq!(turn.angle(), 1.0);
    }

    #[test]
    fn test_parse_script() {
        let turns = parse_script("  x[-1] y[0.5]'\n z[1]2 ").unwrap();
        assert_eq!(turns.len(), 3);
        let text: Vec<String> = turns.iter().map(ToString::to_string).collect();
        assert_eq!(text, ["x[-1]", "y[0.5]'", "z[1]2"]);
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors_name_the_token() {
        match parse_script("x[0] w[1]") {
            Err(PuzzleError::Notation { fragment, .. }) => assert_eq!(fragment, "w[1]"),
            other => panic!("unexpected result: {other:?}"),
        }
        match parse_script("x[0]y[1]") {
            Err(PuzzleError::Notation { fragment, .. }) => assert_eq!(fragment, "y[1]"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(parse_script("x[]").is_err());
    }
}
