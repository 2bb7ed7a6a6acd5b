// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP record tokenizer using nom
//!
//! Turns one `#id=TYPE(args);` record of the DATA section into tokens.
//! Only what the import pipeline needs is recognised; this is not a general
//! EXPRESS reader.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// STEP token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal: 'text'
    String(&'a str),
    /// Integer: 42
    Integer(i64),
    /// Real: 3.14 (NaN when the literal could not be converted)
    Float(f64),
    /// Enum: .T., .ELEMENT.
    Enum(&'a str),
    /// List: (1, 2, 3)
    List(Vec<Token<'a>>),
    /// Typed value: IFCLENGTHMEASURE(2.5)
    TypedValue(&'a str, Vec<Token<'a>>),
    /// Null value: $
    Null,
    /// Derived value: *
    Derived,
}

fn entity_ref(input: &str) -> IResult<&str, Token> {
    map(
        preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
        Token::EntityRef,
    )(input)
}

/// Quoted string; a doubled quote escapes the quote character
fn string_literal(input: &str) -> IResult<&str, Token> {
    fn content(input: &str) -> IResult<&str, &str> {
        let bytes = input.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\'' {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                    continue;
                }
                return Ok((&input[i..], &input[..i]));
            }
            i += 1;
        }
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }

    map(delimited(char('\''), content, char('\'')), Token::String)(input)
}

fn integer(input: &str) -> IResult<&str, Token> {
    map_res(
        recognize(pair(opt(one_of("+-")), digit1)),
        |s: &str| s.parse::<i64>().map(Token::Integer),
    )(input)
}

/// Real literal. The tail after the decimal point is taken greedily so that a
/// malformed literal still tokenizes; conversion failure yields NaN.
fn float(input: &str) -> IResult<&str, Token> {
    map(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            char('.'),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        ))),
        |s: &str| Token::Float(parse_real(s)),
    )(input)
}

/// Convert a real literal, yielding NaN instead of failing
#[inline]
pub fn parse_real(literal: &str) -> f64 {
    fast_float::parse::<f64, _>(literal).unwrap_or(f64::NAN)
}

fn enum_value(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('.'),
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            char('.'),
        ),
        Token::Enum,
    )(input)
}

fn null(input: &str) -> IResult<&str, Token> {
    map(char('$'), |_| Token::Null)(input)
}

fn derived(input: &str) -> IResult<&str, Token> {
    map(char('*'), |_| Token::Derived)(input)
}

fn typed_value(input: &str) -> IResult<&str, Token> {
    map(
        pair(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            arguments,
        ),
        |(type_name, args)| Token::TypedValue(type_name, args),
    )(input)
}

/// Skip whitespace and `/* */` comments
fn ws(input: &str) -> IResult<&str, ()> {
    let mut rest = input.trim_start();
    while let Some(comment) = rest.strip_prefix("/*") {
        rest = match comment.find("*/") {
            Some(end) => comment[end + 2..].trim_start(),
            None => "",
        };
    }
    Ok((rest, ()))
}

fn token(input: &str) -> IResult<&str, Token> {
    delimited(
        ws,
        alt((
            float, // before integer, a real always contains '.'
            integer,
            entity_ref,
            string_literal,
            enum_value,
            list,
            typed_value,
            null,
            derived,
        )),
        ws,
    )(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<Token>> {
    delimited(
        char('('),
        separated_list0(delimited(ws, char(','), ws), token),
        preceded(ws, char(')')),
    )(input)
}

fn list(input: &str) -> IResult<&str, Token> {
    map(arguments, Token::List)(input)
}

/// Parse a complete record
/// Example: `#123=IFCWALL('guid',#2,$,$,$,#5,#6,$);`
///
/// Returns the id, the upper-case type name and the argument tokens.
pub fn parse_entity(input: &str) -> Result<(u32, &str, Vec<Token>)> {
    let result: IResult<&str, (u32, &str, Vec<Token>)> = tuple((
        delimited(
            ws,
            preceded(char('#'), map_res(digit1, |s: &str| s.parse::<u32>())),
            ws,
        ),
        preceded(
            char('='),
            delimited(
                ws,
                take_while1(|c: char| c.is_alphanumeric() || c == '_'),
                ws,
            ),
        ),
        delimited(ws, arguments, tuple((ws, char(';')))),
    ))(input);

    match result {
        Ok((_, (id, type_name, args))) => Ok((id, type_name, args)),
        Err(e) => Err(Error::parse(0, format!("Failed to parse entity: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(entity_ref("#123"), Ok(("", Token::EntityRef(123))));
        assert_eq!(string_literal("'it''s'"), Ok(("", Token::String("it''s"))));
        assert_eq!(integer("-42"), Ok(("", Token::Integer(-42))));
        assert_eq!(float("0."), Ok(("", Token::Float(0.0))));
        assert_eq!(float("1.5E-10"), Ok(("", Token::Float(1.5e-10))));
        assert_eq!(enum_value(".ELEMENT."), Ok(("", Token::Enum("ELEMENT"))));
    }

    #[test]
    fn test_malformed_real_is_nan() {
        let (rest, token) = float("1.2.3").unwrap();
        assert_eq!(rest, "");
        match token {
            Token::Float(f) => assert!(f.is_nan()),
            other => panic!("Expected Float, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_list() {
        let (_, token) = list("(1,(2.,3.),#4)").unwrap();
        match token {
            Token::List(items) => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0], Token::Integer(1));
                assert_eq!(
                    items[1],
                    Token::List(vec![Token::Float(2.0), Token::Float(3.0)])
                );
                assert_eq!(items[2], Token::EntityRef(4));
            }
            other => panic!("Expected List, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_entity() {
        let (id, type_name, args) =
            parse_entity("#9 = IFCDIRECTION((0.,0.,1.));").expect("record should parse");
        assert_eq!(id, 9);
        assert_eq!(type_name, "IFCDIRECTION");
        assert_eq!(args.len(), 1);

        let (_, _, args) =
            parse_entity("#5=IFCBUILDINGSTOREY('g',#2,'L1',$,$,#6,$,$,.ELEMENT.,3.1);").unwrap();
        assert_eq!(args.len(), 10);
        assert_eq!(args[9], Token::Float(3.1));
    }

    #[test]
    fn test_typed_value() {
        let (_, _, args) = parse_entity("#1=IFCPROPERTYSINGLEVALUE('W',$,IFCLENGTHMEASURE(2.5),$);")
            .unwrap();
        assert_eq!(
            args[2],
            Token::TypedValue("IFCLENGTHMEASURE", vec![Token::Float(2.5)])
        );
    }

    #[test]
    fn test_truncated_record_fails() {
        assert!(parse_entity("#1=IFCWALL('g',$").is_err());
    }
}
