//! Move notation: tokens, parsing and the two input paths that produce them.
//!
//! A token is one base letter from `R U F L D B M E S x y z` followed by at
//! most one modifier: nothing (quarter turn clockwise), `'` (inverse) or `2`
//! (double turn).
//!
//! Keyboard input can only reach quarter and inverse turns: the unshifted key
//! picks the base letter, the shifted key its inverse. Double turns come only
//! from the button path, where the modifier is chosen separately.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    character::complete::{anychar, char, multispace0, multispace1},
    combinator::{all_consuming, map, map_opt, opt, value},
    multi::separated_list0,
    sequence::{delimited, pair},
    IResult,
};

use crate::error::{CubeError, CubeResult};

/// Face, slice or whole-puzzle rotation named by a base letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Right,
    Up,
    Front,
    Left,
    Down,
    Back,
    Middle,
    Equator,
    Standing,
    X,
    Y,
    Z,
}

impl Face {
    pub const ALL: [Face; 12] = [
        Face::Right,
        Face::Up,
        Face::Front,
        Face::Left,
        Face::Down,
        Face::Back,
        Face::Middle,
        Face::Equator,
        Face::Standing,
        Face::X,
        Face::Y,
        Face::Z,
    ];

    pub fn letter(self) -> char {
        match self {
            Face::Right => 'R',
            Face::Up => 'U',
            Face::Front => 'F',
            Face::Left => 'L',
            Face::Down => 'D',
            Face::Back => 'B',
            Face::Middle => 'M',
            Face::Equator => 'E',
            Face::Standing => 'S',
            Face::X => 'x',
            Face::Y => 'y',
            Face::Z => 'z',
        }
    }

    /// Exact, case-sensitive lookup: `r` is not a base letter
    pub fn from_letter(letter: char) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.letter() == letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Modifier {
    #[default]
    None,
    Inverse,
    Double,
}

impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::None, Modifier::Inverse, Modifier::Double];

    pub fn suffix(self) -> &'static str {
        match self {
            Modifier::None => "",
            Modifier::Inverse => "'",
            Modifier::Double => "2",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Modifier> {
        Modifier::ALL.into_iter().find(|m| m.suffix() == suffix)
    }

    /// Signed number of quarter turns, clockwise positive
    pub fn quarter_turns(self) -> i32 {
        match self {
            Modifier::None => 1,
            Modifier::Inverse => -1,
            Modifier::Double => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveToken {
    pub face: Face,
    pub modifier: Modifier,
}

impl MoveToken {
    pub fn new(face: Face, modifier: Modifier) -> Self {
        Self { face, modifier }
    }

    /// Combine a base letter and a modifier
    pub fn encode(base: char, modifier: Modifier) -> CubeResult<Self> {
        Face::from_letter(base)
            .map(|face| Self::new(face, modifier))
            .ok_or_else(|| CubeError::InvalidMoveToken(base.to_string()))
    }

    /// Keyboard path. Unshifted key gives a quarter turn, shifted key the
    /// inverse; never a double turn.
    pub fn from_key(key: char) -> Option<Self> {
        Face::ALL.into_iter().find_map(|face| {
            let letter = face.letter();
            if key == letter.to_ascii_lowercase() {
                Some(Self::new(face, Modifier::None))
            } else if key == letter.to_ascii_uppercase() {
                Some(Self::new(face, Modifier::Inverse))
            } else {
                None
            }
        })
    }

    /// Button path: the button's base attribute plus the selected modifier radio value
    pub fn from_button(base: &str, radio: &str) -> CubeResult<Self> {
        let invalid = || CubeError::InvalidMoveToken(format!("{base}{radio}"));
        let mut letters = base.chars();
        let letter = letters.next().ok_or_else(invalid)?;
        if letters.next().is_some() {
            return Err(invalid());
        }
        let modifier = Modifier::from_suffix(radio).ok_or_else(invalid)?;
        Self::encode(letter, modifier).map_err(|_| invalid())
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.modifier.suffix())
    }
}

impl FromStr for MoveToken {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(token)(s)
            .map(|(_, token)| token)
            .map_err(|_| CubeError::InvalidMoveToken(s.to_string()))
    }
}

/// Parse whitespace-separated notation such as `"R U R' U'"`
pub fn parse_sequence(input: &str) -> CubeResult<Vec<MoveToken>> {
    all_consuming(delimited(
        multispace0,
        separated_list0(multispace1, token),
        multispace0,
    ))(input)
    .map(|(_, tokens)| tokens)
    .map_err(|_| CubeError::InvalidMoveToken(input.to_string()))
}

fn face(input: &str) -> IResult<&str, Face> {
    map_opt(anychar, Face::from_letter)(input)
}

fn modifier(input: &str) -> IResult<&str, Modifier> {
    map(
        opt(alt((
            value(Modifier::Inverse, char('\'')),
            value(Modifier::Double, char('2')),
        ))),
        Option::unwrap_or_default,
    )(input)
}

fn token(input: &str) -> IResult<&str, MoveToken> {
    map(pair(face, modifier), |(face, modifier)| MoveToken::new(face, modifier))(input)
}
