use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub const SCRAMBLE_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::U, Face::D, Face::L, Face::R, Face::F, Face::B];

    fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(Face::U),
            'D' => Some(Face::D),
            'L' => Some(Face::L),
            'R' => Some(Face::R),
            'F' => Some(Face::F),
            'B' => Some(Face::B),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Clockwise,
    Prime,
    Double,
}

impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::Clockwise, Modifier::Prime, Modifier::Double];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Clockwise => "",
            Modifier::Prime => "'",
            Modifier::Double => "2",
        }
    }
}

/// A single face turn, e.g. `R'` or `U2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub face: Face,
    pub modifier: Modifier,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, self.modifier.as_str())
    }
}

impl FromStr for Move {
    type Err = ParseScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .and_then(Face::from_char)
            .ok_or_else(|| ParseScrambleError(s.to_string()))?;
        let modifier = match chars.as_str() {
            "" => Modifier::Clockwise,
            "'" => Modifier::Prime,
            "2" => Modifier::Double,
            _ => return Err(ParseScrambleError(s.to_string())),
        };
        Ok(Move { face, modifier })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid move token: {0:?}")]
pub struct ParseScrambleError(pub String);

/// Sequence of moves that defines the starting position for a solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scramble {
    moves: Vec<Move>,
}

impl Scramble {
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// True when no two adjacent moves turn the same face
    pub fn has_no_repeated_faces(&self) -> bool {
        self.moves.windows(2).all(|w| w[0].face != w[1].face)
    }
}

impl fmt::Display for Scramble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for m in &self.moves {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{m}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Scramble {
    type Err = ParseScrambleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let moves = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Move>, _>>()?;
        Ok(Scramble { moves })
    }
}

/// Random move generator; each call to [`ScrambleGenerator::generate`]
/// yields an independent sequence.
pub struct ScrambleGenerator<R: Rng> {
    rng: R,
    length: usize,
}

impl<R: Rng> ScrambleGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            length: SCRAMBLE_LENGTH,
        }
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn generate(&mut self) -> Scramble {
        let mut moves: Vec<Move> = Vec::with_capacity(self.length);
        let mut last_face: Option<Face> = None;

        for _ in 0..self.length {
            // resample until the face differs from the previous move
            let face = loop {
                let candidate = *Face::ALL
                    .choose(&mut self.rng)
                    .unwrap_or(&Face::U);
                if Some(candidate) != last_face {
                    break candidate;
                }
            };
            let modifier = Modifier::ALL[self.rng.gen_range(0..Modifier::ALL.len())];

            last_face = Some(face);
            moves.push(Move { face, modifier });
        }

        Scramble { moves }
    }
}

/// Generate a fresh scramble from the thread-local RNG
pub fn generate_scramble() -> Scramble {
    ScrambleGenerator::with_rng(rand::thread_rng()).generate()
}
