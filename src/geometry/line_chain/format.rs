use std::fmt;
use std::str::FromStr;

use crate::error::{ChainError, ParseError, Result};
use crate::math::{Coord, Point};

use super::LineChain;

impl LineChain {
    /// Textual form of the vertices and closed flag.
    ///
    /// Arc overlay and width are not included.
    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// Reads the textual form produced by [`LineChain::format`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on malformed input.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parser = Parser::new(text);
        let chain = parser.chain()?;
        tracing::trace!(points = chain.point_count(), "parsed chain");
        Ok(chain)
    }
}

impl fmt::Display for LineChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineChain( {{")?;
        for (i, p) in self.points.iter().enumerate() {
            let sep = if i == 0 { "" } else { "," };
            write!(f, "{sep} Point( {}, {} )", p.x, p.y)?;
        }
        write!(f, " }}, {} );", self.closed)
    }
}

impl FromStr for LineChain {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Number(&'a str),
    Punct(char),
}

impl Token<'_> {
    fn text(&self) -> String {
        match self {
            Token::Word(s) | Token::Number(s) => (*s).to_owned(),
            Token::Punct(c) => c.to_string(),
        }
    }
}

/// Recursive-descent reader for `LineChain( { Point( x, y ), ... }, closed );`.
struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn chain(&mut self) -> Result<LineChain> {
        self.word("LineChain")?;
        self.punct('(')?;
        self.punct('{')?;

        let mut points = Vec::new();
        if !self.eat('}') {
            loop {
                points.push(self.point()?);
                if self.eat('}') {
                    break;
                }
                self.punct(',')?;
            }
        }

        self.punct(',')?;
        let closed = self.boolean()?;
        self.punct(')')?;
        self.eat(';');

        if let Some((offset, token)) = self.next_token() {
            return Err(unexpected("end of input", token, offset));
        }
        Ok(LineChain::from_points(&points, closed))
    }

    fn point(&mut self) -> Result<Point> {
        self.word("Point")?;
        self.punct('(')?;
        let x = self.number()?;
        self.punct(',')?;
        let y = self.number()?;
        self.punct(')')?;
        Ok(Point::new(x, y))
    }

    fn word(&mut self, expected: &'static str) -> Result<()> {
        match self.next_token() {
            Some((_, Token::Word(w))) if w == expected => Ok(()),
            Some((offset, token)) => Err(unexpected(expected, token, offset)),
            None => Err(ParseError::UnexpectedEnd(expected).into()),
        }
    }

    fn boolean(&mut self) -> Result<bool> {
        match self.next_token() {
            Some((_, Token::Word("true"))) => Ok(true),
            Some((_, Token::Word("false"))) => Ok(false),
            Some((offset, token)) => Err(unexpected("true or false", token, offset)),
            None => Err(ParseError::UnexpectedEnd("true or false").into()),
        }
    }

    fn number(&mut self) -> Result<Coord> {
        match self.next_token() {
            Some((_, Token::Number(n))) => n
                .parse::<Coord>()
                .map_err(|_| ParseError::InvalidNumber(n.to_owned()).into()),
            Some((offset, token)) => Err(unexpected("a number", token, offset)),
            None => Err(ParseError::UnexpectedEnd("a number").into()),
        }
    }

    fn punct(&mut self, c: char) -> Result<()> {
        let expected = match c {
            '(' => "'('",
            ')' => "')'",
            '{' => "'{'",
            '}' => "'}'",
            ',' => "','",
            _ => "';'",
        };
        match self.next_token() {
            Some((_, Token::Punct(p))) if p == c => Ok(()),
            Some((offset, token)) => Err(unexpected(expected, token, offset)),
            None => Err(ParseError::UnexpectedEnd(expected).into()),
        }
    }

    /// Consumes `c` if it is the next token.
    fn eat(&mut self, c: char) -> bool {
        let saved = self.pos;
        if matches!(self.next_token(), Some((_, Token::Punct(p))) if p == c) {
            return true;
        }
        self.pos = saved;
        false
    }

    fn next_token(&mut self) -> Option<(usize, Token<'a>)> {
        let rest = &self.text[self.pos..];
        let trimmed = rest.trim_start();
        let start = self.pos + (rest.len() - trimmed.len());
        let mut chars = trimmed.char_indices();
        let (_, first) = chars.next()?;

        let len = if first.is_ascii_alphabetic() || first == '_' {
            trimmed
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(trimmed.len())
        } else if first.is_ascii_digit() || first == '-' || first == '+' {
            1 + trimmed[1..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(trimmed.len() - 1)
        } else {
            first.len_utf8()
        };

        let text = &trimmed[..len];
        self.pos = start + len;
        let token = if first.is_ascii_alphabetic() || first == '_' {
            Token::Word(text)
        } else if first.is_ascii_digit() || first == '-' || first == '+' {
            Token::Number(text)
        } else {
            Token::Punct(first)
        };
        Some((start, token))
    }
}

fn unexpected(expected: &'static str, token: Token<'_>, offset: usize) -> ChainError {
    ParseError::UnexpectedToken {
        expected,
        found: token.text(),
        offset,
    }
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn formats_points_and_flag() {
        let chain = LineChain::from_points(&[pt(0, 0), pt(10, -5)], true);
        assert_eq!(
            chain.format(),
            "LineChain( { Point( 0, 0 ), Point( 10, -5 ) }, true );"
        );
        assert_eq!(LineChain::new().to_string(), "LineChain( { }, false );");
    }

    #[test]
    fn parses_own_output() {
        let chain = LineChain::from_points(&[pt(1, 2), pt(-3, 4), pt(-3, 4)], false);
        let parsed: LineChain = chain.format().parse().unwrap();
        assert_eq!(parsed, chain);
        assert_eq!(LineChain::parse("LineChain( { }, true );").unwrap().point_count(), 0);
    }

    #[test]
    fn tolerates_whitespace_and_missing_semicolon() {
        let chain = LineChain::parse("  LineChain({Point(1,2),Point( 3 , 4 )},false)\n").unwrap();
        assert_eq!(chain.points(), &[pt(1, 2), pt(3, 4)]);
        assert!(!chain.is_closed());
    }

    #[test]
    fn reports_unexpected_tokens() {
        let err = LineChain::parse("Polygon( { }, true );").unwrap_err();
        assert_eq!(
            err,
            ChainError::Parse(ParseError::UnexpectedToken {
                expected: "LineChain",
                found: "Polygon".into(),
                offset: 0,
            })
        );

        let err = LineChain::parse("LineChain( { Point( 1, 2 ) }, maybe );").unwrap_err();
        assert!(matches!(
            err,
            ChainError::Parse(ParseError::UnexpectedToken { offset: 30, .. })
        ));
    }

    #[test]
    fn reports_truncated_input() {
        let err = LineChain::parse("LineChain( { Point( 1, 2 )").unwrap_err();
        assert_eq!(err, ChainError::Parse(ParseError::UnexpectedEnd("'}'")));
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let err = LineChain::parse("LineChain( { Point( 99999999999, 0 ) }, false );").unwrap_err();
        assert_eq!(
            err,
            ChainError::Parse(ParseError::InvalidNumber("99999999999".into()))
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(LineChain::parse("LineChain( { }, false ); extra").is_err());
    }
}
