// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CSS-subset selector engine.
//!
//! ## Supported syntax
//!
//! - Selector lists: `a, b`.
//! - Compound selectors: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`, `[attr="value"]`.
//! - Combinators: descendant (whitespace) and child (`>`).
//!
//! Pseudo-classes, sibling combinators, and namespaces are not supported and fail to parse.
//!
//! ## Matching
//!
//! Matching runs right to left, from the candidate element up through its ancestors.
//! The parentless document root is never an element for matching purposes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{Document, NodeId};

/// Errors reported by [`Selector::parse`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The input (or one entry of a list) was empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot start or continue a selector.
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),
    /// An attribute selector was missing its closing bracket or quote.
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    /// A combinator with no compound selector on one side.
    #[error("dangling combinator at offset {0}")]
    DanglingCombinator(usize),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Simple {
    Tag(String),
    Id(String),
    Class(String),
    Attr(String, Option<String>),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Compound {
    // An empty list is the universal selector.
    simples: Vec<Simple>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
    // `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
///
/// ```
/// use understory_dom::{Document, ElementSpec, Selector};
///
/// let mut doc = Document::new();
/// let list = doc.create_element(doc.root(), ElementSpec::new("ul").class("menu"));
/// let item = doc.create_element(list, ElementSpec::new("li").id("first"));
///
/// let sel = Selector::parse("ul.menu > li, #missing").unwrap();
/// assert!(sel.matches(&doc, item));
/// assert!(!sel.matches(&doc, list));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let alternatives = split_list(input)
            .into_iter()
            .map(|(offset, part)| parse_complex(part, offset))
            .collect::<Result<_, _>>()?;
        Ok(Self { alternatives })
    }

    /// Returns true if `node` matches any selector in the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if doc.parent(node).is_none() {
            return false;
        }
        self.alternatives
            .iter()
            .any(|c| match_from(doc, c, c.compounds.len() - 1, node))
    }
}

impl core::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a selector list on commas that sit outside brackets and quotes.
///
/// Each part comes with its byte offset into `input`.
fn split_list(input: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                parts.push((start, &input[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &input[start..]));
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Cursor<'a> {
    chars: core::iter::Peekable<core::str::CharIndices<'a>>,
    base: usize,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn pos(&mut self, end: usize) -> usize {
        self.base + self.chars.peek().map_or(end, |&(i, _)| i)
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }

    fn skip_ws(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }
}

fn parse_complex(input: &str, base: usize) -> Result<Complex, SelectorError> {
    let end = input.len();
    let mut cur = Cursor {
        chars: input.char_indices().peekable(),
        base,
    };
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    cur.skip_ws();
    if cur.peek().is_none() {
        return Err(SelectorError::Empty);
    }
    loop {
        let Some(compound) = parse_compound(&mut cur, end)? else {
            return Err(match cur.peek() {
                Some(c) => SelectorError::UnexpectedChar(c, cur.pos(end)),
                None => SelectorError::Empty,
            });
        };
        compounds.push(compound);

        let ws = cur.skip_ws();
        match cur.peek() {
            None => break,
            Some('>') => {
                let pos = cur.pos(end);
                cur.chars.next();
                cur.skip_ws();
                if cur.peek().is_none() {
                    return Err(SelectorError::DanglingCombinator(pos));
                }
                combinators.push(Combinator::Child);
            }
            Some(_) if ws => combinators.push(Combinator::Descendant),
            Some(c) => return Err(SelectorError::UnexpectedChar(c, cur.pos(end))),
        }
    }

    Ok(Complex {
        compounds,
        combinators,
    })
}

fn parse_compound(cur: &mut Cursor<'_>, end: usize) -> Result<Option<Compound>, SelectorError> {
    let mut simples = Vec::new();
    let mut any = false;

    match cur.peek() {
        Some('*') => {
            cur.chars.next();
            any = true;
        }
        Some(c) if is_ident_char(c) => {
            simples.push(Simple::Tag(cur.ident().to_ascii_lowercase()));
            any = true;
        }
        _ => {}
    }

    loop {
        match cur.peek() {
            Some(sigil @ ('#' | '.')) => {
                let pos = cur.pos(end);
                cur.chars.next();
                let name = cur.ident();
                if name.is_empty() {
                    return Err(SelectorError::UnexpectedChar(sigil, pos));
                }
                simples.push(if sigil == '#' {
                    Simple::Id(name)
                } else {
                    Simple::Class(name)
                });
            }
            Some('[') => {
                cur.chars.next();
                simples.push(parse_attr(cur, end)?);
            }
            _ => break,
        }
        any = true;
    }

    Ok(any.then_some(Compound { simples }))
}

fn parse_attr(cur: &mut Cursor<'_>, end: usize) -> Result<Simple, SelectorError> {
    cur.skip_ws();
    let name = cur.ident();
    if name.is_empty() {
        return match cur.peek() {
            Some(c) => Err(SelectorError::UnexpectedChar(c, cur.pos(end))),
            None => Err(SelectorError::UnterminatedAttribute),
        };
    }
    cur.skip_ws();
    let value = match cur.peek() {
        Some(']') => None,
        Some('=') => {
            cur.chars.next();
            cur.skip_ws();
            let v = match cur.peek() {
                Some(q @ ('"' | '\'')) => {
                    cur.chars.next();
                    let mut v = String::new();
                    loop {
                        match cur.chars.next() {
                            Some((_, c)) if c == q => break,
                            Some((_, c)) => v.push(c),
                            None => return Err(SelectorError::UnterminatedAttribute),
                        }
                    }
                    v
                }
                _ => cur.ident(),
            };
            cur.skip_ws();
            Some(v)
        }
        Some(c) => return Err(SelectorError::UnexpectedChar(c, cur.pos(end))),
        None => return Err(SelectorError::UnterminatedAttribute),
    };
    match cur.chars.next() {
        Some((_, ']')) => Ok(Simple::Attr(name, value)),
        _ => Err(SelectorError::UnterminatedAttribute),
    }
}

fn match_compound(doc: &Document, compound: &Compound, node: NodeId) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };
    compound.simples.iter().all(|s| match s {
        Simple::Tag(t) => el.tag == *t,
        Simple::Id(id) => el.id.as_deref() == Some(id.as_str()),
        Simple::Class(c) => el.has_class(c),
        Simple::Attr(name, None) => el.attribute(name).is_some(),
        Simple::Attr(name, Some(v)) => el.attribute(name).as_deref() == Some(v.as_str()),
    })
}

// Elements are nodes with a parent; the document root only anchors the tree.
fn element_parent(doc: &Document, node: NodeId) -> Option<NodeId> {
    doc.parent(node).filter(|p| doc.parent(*p).is_some())
}

fn match_from(doc: &Document, complex: &Complex, idx: usize, node: NodeId) -> bool {
    if !match_compound(doc, &complex.compounds[idx], node) {
        return false;
    }
    if idx == 0 {
        return true;
    }
    match complex.combinators[idx - 1] {
        Combinator::Child => {
            element_parent(doc, node).is_some_and(|p| match_from(doc, complex, idx - 1, p))
        }
        Combinator::Descendant => {
            let mut cur = element_parent(doc, node);
            while let Some(p) = cur {
                if match_from(doc, complex, idx - 1, p) {
                    return true;
                }
                cur = element_parent(doc, p);
            }
            false
        }
    }
}

impl core::fmt::Display for Selector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, complex) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            for (j, compound) in complex.compounds.iter().enumerate() {
                if j > 0 {
                    f.write_str(match complex.combinators[j - 1] {
                        Combinator::Descendant => " ",
                        Combinator::Child => " > ",
                    })?;
                }
                if compound.simples.is_empty() {
                    f.write_str("*")?;
                }
                for s in &compound.simples {
                    match s {
                        Simple::Tag(t) => f.write_str(t)?,
                        Simple::Id(id) => write!(f, "#{id}")?,
                        Simple::Class(c) => write!(f, ".{c}")?,
                        Simple::Attr(n, None) => write!(f, "[{n}]")?,
                        Simple::Attr(n, Some(v)) => write!(f, "[{n}=\"{v}\"]")?,
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementSpec;
    use alloc::string::ToString;

    fn fixture() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let html = doc.create_element(doc.root(), ElementSpec::new("html"));
        let block1 = doc.create_element(html, ElementSpec::new("div").id("block1").class("block1"));
        let block2 = doc.create_element(
            block1,
            ElementSpec::new("div")
                .id("block2")
                .class("block2")
                .attr("data-role", "button"),
        );
        (doc, html, block1, block2)
    }

    #[test]
    fn parses_and_prints_lists() {
        let sel = Selector::parse("div#a.b[c][d='e'] > span  p, *").unwrap();
        assert_eq!(sel.to_string(), "div#a.b[c][d=\"e\"] > span p, *");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("a,"), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse("a >"),
            Err(SelectorError::DanglingCombinator(2))
        );
        assert_eq!(
            Selector::parse("[x"),
            Err(SelectorError::UnterminatedAttribute)
        );
        assert_eq!(
            Selector::parse("a:hover"),
            Err(SelectorError::UnexpectedChar(':', 1))
        );
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("> a").is_err());
    }

    #[test]
    fn commas_inside_attribute_values_do_not_split_the_list() {
        let mut doc = Document::new();
        let meta = doc.create_element(
            doc.root(),
            ElementSpec::new("meta").attr("content", "a, b"),
        );
        let sel = Selector::parse(r#"[content="a, b"], #other"#).unwrap();
        assert_eq!(sel.to_string(), r#"[content="a, b"], #other"#);
        assert!(sel.matches(&doc, meta));
        assert!(Selector::parse("[content='x,y']").unwrap().alternatives.len() == 1);
        assert_eq!(
            Selector::parse("a, [b, c]"),
            Err(SelectorError::UnexpectedChar(',', 5))
        );
    }

    #[test]
    fn trailing_whitespace_is_accepted() {
        let sel = Selector::parse("  div  ").unwrap();
        assert_eq!(sel.to_string(), "div");
    }

    #[test]
    fn compound_parts_all_must_match() {
        let (doc, _, block1, block2) = fixture();
        assert!(Selector::parse("#block2").unwrap().matches(&doc, block2));
        assert!(Selector::parse("div.block2#block2").unwrap().matches(&doc, block2));
        assert!(!Selector::parse("div.block1#block2").unwrap().matches(&doc, block2));
        assert!(Selector::parse("[data-role=button]").unwrap().matches(&doc, block2));
        assert!(Selector::parse("[data-role]").unwrap().matches(&doc, block2));
        assert!(!Selector::parse("[data-role]").unwrap().matches(&doc, block1));
        assert!(Selector::parse("[class=block1]").unwrap().matches(&doc, block1));
    }

    #[test]
    fn combinators_walk_ancestors() {
        let (doc, html, block1, block2) = fixture();
        assert!(Selector::parse("html #block2").unwrap().matches(&doc, block2));
        assert!(Selector::parse("html > div > div").unwrap().matches(&doc, block2));
        assert!(!Selector::parse("html > #block2").unwrap().matches(&doc, block2));
        assert!(Selector::parse("#block1 > div").unwrap().matches(&doc, block2));
        assert!(!Selector::parse("#block1 > div").unwrap().matches(&doc, block1));
        assert!(Selector::parse("html").unwrap().matches(&doc, html));
    }

    #[test]
    fn document_root_never_matches() {
        let (doc, ..) = fixture();
        assert!(!Selector::parse("*").unwrap().matches(&doc, doc.root()));
        assert!(!Selector::parse("#document").unwrap().matches(&doc, doc.root()));
    }

    #[test]
    fn universal_matches_any_element() {
        let (doc, html, _, block2) = fixture();
        let sel = Selector::parse("*").unwrap();
        assert!(sel.matches(&doc, html));
        assert!(sel.matches(&doc, block2));
        assert!(!Selector::parse("* > html").unwrap().matches(&doc, html));
    }
}
