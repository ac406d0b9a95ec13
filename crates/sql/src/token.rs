// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
	// Keywords
	Keyword(Keyword),
	// Identifiers
	Ident(String),
	QuotedIdent(String),
	// Literals
	Integer(i64),
	Float(f64),
	StringLit(String),
	// Operators & punctuation
	Asterisk,   // *
	Comma,      // ,
	Dot,        // .
	Semicolon,  // ;
	OpenParen,  // (
	CloseParen, // )
	Plus,       // +
	Minus,      // -
	Slash,      // /
	Percent,    // %
	Eq,         // =
	NotEq,      // <> or !=
	Lt,         // <
	Gt,         // >
	LtEq,       // <=
	GtEq,       // >=
	Concat,     // ||
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
	Select,
	From,
	Where,
	And,
	Or,
	Not,
	As,
	Order,
	By,
	Group,
	Having,
	Limit,
	Union,
	Distinct,
	Create,
	Table,
	View,
	Foreign,
	Virtual,
	Procedure,
	Function,
	Options,
	Constraint,
	Join,
	Inner,
	Left,
	Right,
	Full,
	Outer,
	Cross,
	On,
	Null,
	Is,
	In,
	With,
	Primary,
	Key,
	Unique,
}

pub fn keyword(word: &str) -> Option<Keyword> {
	let keyword = match word.to_ascii_uppercase().as_str() {
		"SELECT" => Keyword::Select,
		"FROM" => Keyword::From,
		"WHERE" => Keyword::Where,
		"AND" => Keyword::And,
		"OR" => Keyword::Or,
		"NOT" => Keyword::Not,
		"AS" => Keyword::As,
		"ORDER" => Keyword::Order,
		"BY" => Keyword::By,
		"GROUP" => Keyword::Group,
		"HAVING" => Keyword::Having,
		"LIMIT" => Keyword::Limit,
		"UNION" => Keyword::Union,
		"DISTINCT" => Keyword::Distinct,
		"CREATE" => Keyword::Create,
		"TABLE" => Keyword::Table,
		"VIEW" => Keyword::View,
		"FOREIGN" => Keyword::Foreign,
		"VIRTUAL" => Keyword::Virtual,
		"PROCEDURE" => Keyword::Procedure,
		"FUNCTION" => Keyword::Function,
		"OPTIONS" => Keyword::Options,
		"CONSTRAINT" => Keyword::Constraint,
		"JOIN" => Keyword::Join,
		"INNER" => Keyword::Inner,
		"LEFT" => Keyword::Left,
		"RIGHT" => Keyword::Right,
		"FULL" => Keyword::Full,
		"OUTER" => Keyword::Outer,
		"CROSS" => Keyword::Cross,
		"ON" => Keyword::On,
		"NULL" => Keyword::Null,
		"IS" => Keyword::Is,
		"IN" => Keyword::In,
		"WITH" => Keyword::With,
		"PRIMARY" => Keyword::Primary,
		"KEY" => Keyword::Key,
		"UNIQUE" => Keyword::Unique,
		_ => return None,
	};
	Some(keyword)
}

pub fn tokenize(sql: &str) -> Result<Vec<Token>, Error> {
	let mut tokens = Vec::new();
	let chars: Vec<char> = sql.chars().collect();
	let len = chars.len();
	let mut i = 0;

	while i < len {
		let c = chars[i];

		// Skip whitespace
		if c.is_whitespace() {
			i += 1;
			continue;
		}

		// Skip line comments (-- ...)
		if c == '-' && i + 1 < len && chars[i + 1] == '-' {
			while i < len && chars[i] != '\n' {
				i += 1;
			}
			continue;
		}

		// Skip block comments (/* ... */)
		if c == '/' && i + 1 < len && chars[i + 1] == '*' {
			i += 2;
			while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
				i += 1;
			}
			if i + 1 >= len {
				return Err(Error("unterminated block comment".into()));
			}
			i += 2;
			continue;
		}

		// Operators and punctuation
		match c {
			'*' => {
				tokens.push(Token::Asterisk);
				i += 1;
				continue;
			}
			',' => {
				tokens.push(Token::Comma);
				i += 1;
				continue;
			}
			'.' => {
				tokens.push(Token::Dot);
				i += 1;
				continue;
			}
			';' => {
				tokens.push(Token::Semicolon);
				i += 1;
				continue;
			}
			'(' => {
				tokens.push(Token::OpenParen);
				i += 1;
				continue;
			}
			')' => {
				tokens.push(Token::CloseParen);
				i += 1;
				continue;
			}
			'+' => {
				tokens.push(Token::Plus);
				i += 1;
				continue;
			}
			'-' => {
				tokens.push(Token::Minus);
				i += 1;
				continue;
			}
			'/' => {
				tokens.push(Token::Slash);
				i += 1;
				continue;
			}
			'%' => {
				tokens.push(Token::Percent);
				i += 1;
				continue;
			}
			'=' => {
				tokens.push(Token::Eq);
				i += 1;
				continue;
			}
			'|' => {
				if i + 1 < len && chars[i + 1] == '|' {
					tokens.push(Token::Concat);
					i += 2;
					continue;
				}
				return Err(Error(format!("unexpected character '|' at position {i}")));
			}
			'<' => {
				if i + 1 < len && chars[i + 1] == '=' {
					tokens.push(Token::LtEq);
					i += 2;
				} else if i + 1 < len && chars[i + 1] == '>' {
					tokens.push(Token::NotEq);
					i += 2;
				} else {
					tokens.push(Token::Lt);
					i += 1;
				}
				continue;
			}
			'>' => {
				if i + 1 < len && chars[i + 1] == '=' {
					tokens.push(Token::GtEq);
					i += 2;
				} else {
					tokens.push(Token::Gt);
					i += 1;
				}
				continue;
			}
			'!' => {
				if i + 1 < len && chars[i + 1] == '=' {
					tokens.push(Token::NotEq);
					i += 2;
					continue;
				}
				return Err(Error(format!("unexpected character '!' at position {i}")));
			}
			_ => {}
		}

		// String literals and quoted identifiers, doubled quote escapes itself
		if c == '\'' || c == '"' {
			let quote = c;
			i += 1;
			let mut s = String::new();
			while i < len {
				if chars[i] == quote {
					if i + 1 < len && chars[i + 1] == quote {
						s.push(quote);
						i += 2;
					} else {
						break;
					}
				} else {
					s.push(chars[i]);
					i += 1;
				}
			}
			if i >= len {
				return Err(Error(if quote == '\'' {
					"unterminated string literal".into()
				} else {
					"unterminated quoted identifier".into()
				}));
			}
			i += 1; // skip closing quote
			tokens.push(if quote == '\'' {
				Token::StringLit(s)
			} else {
				Token::QuotedIdent(s)
			});
			continue;
		}

		// Numeric literals
		if c.is_ascii_digit() {
			let start = i;
			while i < len && chars[i].is_ascii_digit() {
				i += 1;
			}
			if i < len && chars[i] == '.' && i + 1 < len && chars[i + 1].is_ascii_digit() {
				i += 1; // skip dot
				while i < len && chars[i].is_ascii_digit() {
					i += 1;
				}
				let text: String = chars[start..i].iter().collect();
				let f: f64 = text.parse().map_err(|e| Error(format!("invalid float: {e}")))?;
				tokens.push(Token::Float(f));
			} else {
				let text: String = chars[start..i].iter().collect();
				let n: i64 = text.parse().map_err(|e| Error(format!("invalid integer: {e}")))?;
				tokens.push(Token::Integer(n));
			}
			continue;
		}

		// Identifiers and keywords
		if c.is_alphabetic() || c == '_' {
			let start = i;
			while i < len && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
				i += 1;
			}
			let word: String = chars[start..i].iter().collect();
			let token = match keyword(&word) {
				Some(keyword) => Token::Keyword(keyword),
				None => Token::Ident(word),
			};
			tokens.push(token);
			continue;
		}

		return Err(Error(format!("unexpected character '{c}' at position {i}")));
	}

	Ok(tokens)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_simple_select() {
		let tokens = tokenize("SELECT id, name FROM pg.customer").unwrap();
		assert_eq!(
			tokens,
			vec![
				Token::Keyword(Keyword::Select),
				Token::Ident("id".into()),
				Token::Comma,
				Token::Ident("name".into()),
				Token::Keyword(Keyword::From),
				Token::Ident("pg".into()),
				Token::Dot,
				Token::Ident("customer".into()),
			]
		);
	}

	#[test]
	fn test_create_view_header() {
		let tokens = tokenize("create virtual view v").unwrap();
		assert_eq!(
			tokens,
			vec![
				Token::Keyword(Keyword::Create),
				Token::Keyword(Keyword::Virtual),
				Token::Keyword(Keyword::View),
				Token::Ident("v".into()),
			]
		);
	}

	#[test]
	fn test_string_literal() {
		let tokens = tokenize("ANNOTATION 'it''s'").unwrap();
		assert_eq!(tokens, vec![Token::Ident("ANNOTATION".into()), Token::StringLit("it's".into()),]);
	}

	#[test]
	fn test_quoted_identifier() {
		let tokens = tokenize("\"my \"\"view\"\"\"").unwrap();
		assert_eq!(tokens, vec![Token::QuotedIdent("my \"view\"".into())]);
	}

	#[test]
	fn test_comments_are_skipped() {
		let tokens = tokenize("a -- LEFT OUTER JOIN x\n/* b */ c").unwrap();
		assert_eq!(tokens, vec![Token::Ident("a".into()), Token::Ident("c".into())]);
	}

	#[test]
	fn test_comparison_operators() {
		let tokens = tokenize("a <> b").unwrap();
		assert_eq!(tokens, vec![Token::Ident("a".into()), Token::NotEq, Token::Ident("b".into()),]);
	}

	#[test]
	fn test_numeric_literals() {
		let tokens = tokenize("42 3.5").unwrap();
		assert_eq!(tokens, vec![Token::Integer(42), Token::Float(3.5),]);
	}

	#[test]
	fn test_unterminated() {
		assert!(tokenize("'abc").is_err());
		assert!(tokenize("\"abc").is_err());
		assert!(tokenize("/* abc").is_err());
	}
}
