// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Parser for the DDL subset used by view definitions and discovered source
//! schemas: `CREATE [FOREIGN | VIRTUAL] (TABLE | VIEW | PROCEDURE | FUNCTION)`.
//!
//! Queries behind `AS` are not parsed beyond bracket balance and the tables
//! referenced in their `FROM` and `JOIN` clauses.

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use crate::{
	Error,
	token::{Keyword, Token, tokenize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlObjectKind {
	View,
	ForeignTable,
	VirtualTable,
	Procedure,
	Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
	pub parts: Vec<String>,
}

impl QualifiedName {
	/// The last part.
	pub fn name(&self) -> &str {
		self.parts.last().map(String::as_str).unwrap_or_default()
	}

	/// Everything before the last part, joined by dots.
	pub fn qualifier(&self) -> Option<String> {
		match self.parts.len() {
			0 | 1 => None,
			n => Some(self.parts[..n - 1].join(".")),
		}
	}
}

impl Display for QualifiedName {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.parts.join("."))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlColumn {
	pub name: String,
	pub data_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DdlObject {
	pub kind: DdlObjectKind,
	pub name: QualifiedName,
	pub columns: Vec<DdlColumn>,
	pub primary_key: Option<Vec<String>>,
	pub unique_keys: Vec<Vec<String>>,
	pub options: Vec<(String, String)>,
	/// Qualified tables read by the query of a view.
	pub references: Vec<QualifiedName>,
}

impl DdlObject {
	fn new(kind: DdlObjectKind, name: QualifiedName) -> Self {
		Self {
			kind,
			name,
			columns: Vec::new(),
			primary_key: None,
			unique_keys: Vec::new(),
			options: Vec::new(),
			references: Vec::new(),
		}
	}

	pub fn option(&self, key: &str) -> Option<&str> {
		self.options.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v.as_str())
	}

	pub fn annotation(&self) -> Option<&str> {
		self.option("ANNOTATION")
	}

	pub fn is_table_like(&self) -> bool {
		matches!(self.kind, DdlObjectKind::View | DdlObjectKind::ForeignTable | DdlObjectKind::VirtualTable)
	}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ddl {
	pub objects: Vec<DdlObject>,
}

impl Ddl {
	pub fn tables(&self) -> impl Iterator<Item = &DdlObject> {
		self.objects.iter().filter(|o| o.is_table_like())
	}
}

pub fn parse(text: &str) -> Result<Ddl, Error> {
	let tokens = tokenize(text)?;
	Parser {
		tokens,
		pos: 0,
	}
	.parse_ddl()
}

struct Parser {
	tokens: Vec<Token>,
	pos: usize,
}

impl Parser {
	fn parse_ddl(mut self) -> Result<Ddl, Error> {
		let mut ddl = Ddl::default();
		loop {
			while self.consume(&Token::Semicolon) {}
			if self.peek().is_none() {
				break;
			}
			ddl.objects.push(self.parse_create()?);
			match self.peek() {
				None => break,
				Some(Token::Semicolon) => {}
				Some(token) => return Err(Error(format!("expected ';' but found {token:?}"))),
			}
		}
		Ok(ddl)
	}

	fn parse_create(&mut self) -> Result<DdlObject, Error> {
		self.expect_keyword(Keyword::Create)?;

		let foreign = self.consume_keyword(Keyword::Foreign);
		let virtual_ = !foreign && self.consume_keyword(Keyword::Virtual);

		let kind = match self.next() {
			Some(Token::Keyword(Keyword::View)) => DdlObjectKind::View,
			Some(Token::Keyword(Keyword::Table)) if virtual_ => DdlObjectKind::VirtualTable,
			Some(Token::Keyword(Keyword::Table)) => DdlObjectKind::ForeignTable,
			Some(Token::Keyword(Keyword::Procedure)) => DdlObjectKind::Procedure,
			Some(Token::Keyword(Keyword::Function)) => DdlObjectKind::Function,
			Some(token) => return Err(Error(format!("expected object type after CREATE but found {token:?}"))),
			None => return Err(Error("unexpected end of input after CREATE".into())),
		};

		let name = self.parse_qualified_name()?;
		let mut object = DdlObject::new(kind, name);

		match kind {
			DdlObjectKind::Procedure | DdlObjectKind::Function => {
				self.skip_statement()?;
				return Ok(object);
			}
			_ => {}
		}

		if self.consume(&Token::OpenParen) {
			self.parse_elements(&mut object)?;
		}

		if self.consume_keyword(Keyword::Options) {
			object.options = self.parse_options()?;
		}

		if self.consume_keyword(Keyword::As) {
			object.references = self.parse_query()?;
		} else if kind == DdlObjectKind::View {
			return Err(Error(format!("view '{}' has no query", object.name)));
		}

		Ok(object)
	}

	fn parse_elements(&mut self, object: &mut DdlObject) -> Result<(), Error> {
		if self.consume(&Token::CloseParen) {
			return Ok(());
		}
		loop {
			match self.peek() {
				Some(Token::Keyword(Keyword::Primary)) => {
					self.pos += 1;
					self.expect_keyword(Keyword::Key)?;
					object.primary_key = Some(self.parse_name_list()?);
				}
				Some(Token::Keyword(Keyword::Unique)) => {
					self.pos += 1;
					object.unique_keys.push(self.parse_name_list()?);
				}
				Some(Token::Keyword(Keyword::Constraint)) => {
					self.pos += 1;
					self.parse_identifier()?;
					if self.consume_keyword(Keyword::Primary) {
						self.expect_keyword(Keyword::Key)?;
						object.primary_key = Some(self.parse_name_list()?);
					} else if self.consume_keyword(Keyword::Unique) {
						object.unique_keys.push(self.parse_name_list()?);
					} else {
						self.skip_element()?;
					}
				}
				Some(Token::Keyword(Keyword::Foreign)) => {
					self.skip_element()?;
				}
				Some(_) => {
					let column = self.parse_column()?;
					object.columns.push(column);
				}
				None => return Err(Error(format!("unterminated column list of '{}'", object.name))),
			}

			if self.consume(&Token::Comma) {
				continue;
			}
			self.expect(&Token::CloseParen)?;
			return Ok(());
		}
	}

	fn parse_column(&mut self) -> Result<DdlColumn, Error> {
		let name = self.parse_identifier()?;
		let mut data_type = None;
		let mut depth = 0usize;
		while let Some(token) = self.peek() {
			match token {
				Token::Comma | Token::CloseParen if depth == 0 => break,
				Token::OpenParen => depth += 1,
				Token::CloseParen => depth -= 1,
				Token::Keyword(Keyword::Options) if depth == 0 => {
					self.pos += 1;
					self.parse_options()?;
					continue;
				}
				Token::Ident(word) if data_type.is_none() && depth == 0 => {
					data_type = Some(word.to_ascii_lowercase());
				}
				_ => {}
			}
			self.pos += 1;
		}
		Ok(DdlColumn {
			name,
			data_type,
		})
	}

	fn parse_name_list(&mut self) -> Result<Vec<String>, Error> {
		self.expect(&Token::OpenParen)?;
		let mut names = vec![self.parse_identifier()?];
		while self.consume(&Token::Comma) {
			names.push(self.parse_identifier()?);
		}
		self.expect(&Token::CloseParen)?;
		Ok(names)
	}

	fn parse_options(&mut self) -> Result<Vec<(String, String)>, Error> {
		self.expect(&Token::OpenParen)?;
		let mut options = Vec::new();
		loop {
			let key = self.parse_qualified_name()?.to_string();
			let value = match self.next() {
				Some(Token::StringLit(s)) => s,
				Some(Token::Ident(s)) | Some(Token::QuotedIdent(s)) => s,
				Some(Token::Integer(n)) => n.to_string(),
				Some(Token::Float(f)) => f.to_string(),
				Some(token) => return Err(Error(format!("invalid value for option '{key}': {token:?}"))),
				None => return Err(Error(format!("missing value for option '{key}'"))),
			};
			options.push((key, value));
			if !self.consume(&Token::Comma) {
				break;
			}
		}
		self.expect(&Token::CloseParen)?;
		Ok(options)
	}

	/// Consumes a query up to the end of the statement, collecting the
	/// qualified tables of its `FROM` lists and joins.
	fn parse_query(&mut self) -> Result<Vec<QualifiedName>, Error> {
		match self.peek() {
			Some(Token::Keyword(Keyword::Select))
			| Some(Token::Keyword(Keyword::With))
			| Some(Token::OpenParen) => {}
			Some(token) => return Err(Error(format!("expected a query after AS but found {token:?}"))),
			None => return Err(Error("expected a query after AS".into())),
		}

		let mut references: Vec<QualifiedName> = Vec::new();
		let mut depth = 0usize;
		let mut from_depth: Option<usize> = None;
		let mut expect_table = false;

		while let Some(token) = self.peek() {
			match token {
				Token::Semicolon if depth == 0 => break,
				Token::OpenParen => {
					depth += 1;
					expect_table = false;
				}
				Token::CloseParen => {
					if depth == 0 {
						return Err(Error("unbalanced ')' in query".into()));
					}
					if from_depth == Some(depth) {
						from_depth = None;
					}
					depth -= 1;
				}
				Token::Keyword(Keyword::From) | Token::Keyword(Keyword::Join) => {
					from_depth = Some(depth);
					expect_table = true;
				}
				Token::Comma if from_depth == Some(depth) => expect_table = true,
				Token::Keyword(Keyword::Where)
				| Token::Keyword(Keyword::Group)
				| Token::Keyword(Keyword::Order)
				| Token::Keyword(Keyword::Having)
				| Token::Keyword(Keyword::Limit)
				| Token::Keyword(Keyword::Union)
				| Token::Keyword(Keyword::On) => {
					if from_depth == Some(depth) {
						from_depth = None;
					}
					expect_table = false;
				}
				Token::Ident(_) | Token::QuotedIdent(_) if expect_table => {
					expect_table = false;
					let name = self.parse_qualified_name()?;
					if name.parts.len() > 1 && !references.contains(&name) {
						references.push(name);
					}
					continue;
				}
				_ => expect_table = false,
			}
			self.pos += 1;
		}

		if depth != 0 {
			return Err(Error("unbalanced '(' in query".into()));
		}
		Ok(references)
	}

	fn skip_statement(&mut self) -> Result<(), Error> {
		let mut depth = 0usize;
		while let Some(token) = self.peek() {
			match token {
				Token::Semicolon if depth == 0 => break,
				Token::OpenParen => depth += 1,
				Token::CloseParen => {
					depth = depth.checked_sub(1).ok_or_else(|| Error("unbalanced ')'".into()))?
				}
				_ => {}
			}
			self.pos += 1;
		}
		Ok(())
	}

	fn skip_element(&mut self) -> Result<(), Error> {
		let mut depth = 0usize;
		while let Some(token) = self.peek() {
			match token {
				Token::Comma | Token::CloseParen if depth == 0 => return Ok(()),
				Token::OpenParen => depth += 1,
				Token::CloseParen => depth -= 1,
				_ => {}
			}
			self.pos += 1;
		}
		Err(Error("unterminated element".into()))
	}

	fn parse_qualified_name(&mut self) -> Result<QualifiedName, Error> {
		let mut parts = vec![self.parse_identifier()?];
		while self.consume(&Token::Dot) {
			parts.push(self.parse_identifier()?);
		}
		Ok(QualifiedName {
			parts,
		})
	}

	fn parse_identifier(&mut self) -> Result<String, Error> {
		match self.next() {
			Some(Token::Ident(s)) | Some(Token::QuotedIdent(s)) => Ok(s),
			Some(token) => Err(Error(format!("expected identifier but found {token:?}"))),
			None => Err(Error("expected identifier but found end of input".into())),
		}
	}

	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn next(&mut self) -> Option<Token> {
		let token = self.tokens.get(self.pos).cloned();
		if token.is_some() {
			self.pos += 1;
		}
		token
	}

	fn consume(&mut self, expected: &Token) -> bool {
		if self.peek() == Some(expected) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	fn consume_keyword(&mut self, keyword: Keyword) -> bool {
		self.consume(&Token::Keyword(keyword))
	}

	fn expect(&mut self, expected: &Token) -> Result<(), Error> {
		match self.next() {
			Some(ref token) if token == expected => Ok(()),
			Some(token) => Err(Error(format!("expected {expected:?} but found {token:?}"))),
			None => Err(Error(format!("expected {expected:?} but found end of input"))),
		}
	}

	fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), Error> {
		self.expect(&Token::Keyword(keyword))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generated_view() {
		let ddl = parse(
			"CREATE VIEW CustOrders (id, name, PRIMARY KEY(id)) OPTIONS (ANNOTATION 'all customers') AS \
			 SELECT t1.id, t1.name FROM pg.customer AS t1 LEFT OUTER JOIN pg.orders AS t2 ON t1.id = t2.id;",
		)
		.unwrap();

		assert_eq!(ddl.objects.len(), 1);
		let view = &ddl.objects[0];
		assert_eq!(view.kind, DdlObjectKind::View);
		assert_eq!(view.name.name(), "CustOrders");
		assert_eq!(view.columns.len(), 2);
		assert_eq!(view.primary_key, Some(vec!["id".to_string()]));
		assert_eq!(view.annotation(), Some("all customers"));
		assert_eq!(
			view.references.iter().map(ToString::to_string).collect::<Vec<_>>(),
			vec!["pg.customer".to_string(), "pg.orders".to_string()]
		);
	}

	#[test]
	fn test_view_without_columns() {
		let ddl = parse("CREATE VIEW v AS SELECT 1 as col").unwrap();
		assert_eq!(ddl.objects[0].name.name(), "v");
		assert!(ddl.objects[0].columns.is_empty());
		assert!(ddl.objects[0].references.is_empty());
	}

	#[test]
	fn test_references_in_from_list_and_subquery() {
		let ddl = parse("CREATE VIEW v AS SELECT a.x FROM s1.a, s2.b WHERE a.x IN (SELECT y FROM s3.c)").unwrap();
		let refs: Vec<String> = ddl.objects[0].references.iter().map(ToString::to_string).collect();
		assert_eq!(refs, vec!["s1.a", "s2.b", "s3.c"]);
	}

	#[test]
	fn test_foreign_table() {
		let ddl = parse(
			"CREATE FOREIGN TABLE customer (id integer NOT NULL, name string(255) OPTIONS (NAMEINSOURCE 'name'), \
			 UNIQUE(name), CONSTRAINT pk PRIMARY KEY(id)) OPTIONS (ANNOTATION 'people');",
		)
		.unwrap();
		let table = &ddl.objects[0];
		assert_eq!(table.kind, DdlObjectKind::ForeignTable);
		assert_eq!(
			table.columns,
			vec![
				DdlColumn {
					name: "id".into(),
					data_type: Some("integer".into()),
				},
				DdlColumn {
					name: "name".into(),
					data_type: Some("string".into()),
				},
			]
		);
		assert_eq!(table.primary_key, Some(vec!["id".to_string()]));
		assert_eq!(table.unique_keys, vec![vec!["name".to_string()]]);
		assert_eq!(table.annotation(), Some("people"));
	}

	#[test]
	fn test_multiple_objects() {
		let ddl = parse(
			"CREATE VIEW a AS SELECT 1 as col; CREATE VIRTUAL PROCEDURE p() AS BEGIN SELECT 1; END; \
			 CREATE FOREIGN FUNCTION f(x integer) RETURNS integer;",
		);
		// Procedure bodies with inner statements are not supported by the subset.
		assert!(ddl.is_err());

		let ddl = parse("CREATE VIEW a AS SELECT 1 as col; CREATE FOREIGN FUNCTION f(x integer) RETURNS integer;")
			.unwrap();
		assert_eq!(ddl.tables().count(), 1);
		assert_eq!(ddl.objects[1].kind, DdlObjectKind::Function);
	}

	#[test]
	fn test_quoted_view_name() {
		let ddl = parse("CREATE VIEW \"my view\" AS SELECT 1 as col;").unwrap();
		assert_eq!(ddl.objects[0].name.name(), "my view");
	}

	#[test]
	fn test_errors() {
		assert!(parse("CREATE VIEW v").is_err());
		assert!(parse("CREATE VIEW v AS DELETE FROM x").is_err());
		assert!(parse("CREATE VIEW v AS SELECT (1").is_err());
		assert!(parse("SELECT 1").is_err());
		assert!(parse("CREATE INDEX i").is_err());
		assert!(parse("CREATE VIEW v (a, b AS SELECT 1").is_err());
	}

	#[test]
	fn test_empty_input() {
		assert!(parse("").unwrap().objects.is_empty());
		assert!(parse(" ; ; ").unwrap().objects.is_empty());
	}
}
