//! Parser for free-text route targets.
//!
//! Configuration exports describe where a call goes next as loosely
//! formatted text: `Wachtrij(8020 Sales)`, `8020 Sales`, `End Call`,
//! `+31 6 1234 5678`, or a bare extension. [`parse_destination`] classifies
//! such text into a typed [`Destination`]. The forms are tried in a fixed
//! order and the first one that matches wins; text matching none of them is
//! kept verbatim as [`DestinationKind::UnknownText`].

use log::trace;
use winnow::{
    Parser as _,
    ascii::Caseless,
    combinator::{alt, eof, opt, terminated},
    error::{ContextError, ErrMode},
    token::{literal, one_of, take_while},
};

use callmap_core::semantic::{Destination, DestinationKind};

type Input<'src> = &'src str;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Keyword fragments of the `Word(digits)` form, checked in order.
const KEYWORDS: &[(&[&str], DestinationKind)] = &[
    (&["wachtrij", "queue"], DestinationKind::Queue),
    (&["belgroep", "ringgroup"], DestinationKind::RingGroup),
    (&["gebruiker", "user", "extension"], DestinationKind::User),
    (
        &["digital", "receptionist", "ivr"],
        DestinationKind::AutoAttendant,
    ),
    (&["voicemail"], DestinationKind::Voicemail),
];

/// Parse a route target.
///
/// Returns `None` when the text is empty or only whitespace, meaning no
/// destination is configured. Every other input yields a destination; the
/// parser never fails.
///
/// # Examples
///
/// ```
/// use callmap_core::semantic::DestinationKind;
/// use callmap_parser::parse_destination;
///
/// let queue = parse_destination("Wachtrij(8020 Sales)").unwrap();
/// assert_eq!(queue.kind(), DestinationKind::Queue);
/// assert_eq!(queue.identifier(), "8020");
///
/// assert!(parse_destination("   ").is_none());
/// ```
pub fn parse_destination(raw: &str) -> Option<Destination> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut input = trimmed;
    let destination = alt((
        typed_reference,
        labeled_number,
        action,
        external_number,
        bare_number,
    ))
    .parse_next(&mut input)
    .unwrap_or_else(|_: ErrMode<ContextError>| {
        Destination::new(DestinationKind::UnknownText, trimmed)
    });

    trace!(raw = trimmed, destination = destination.to_string(); "Parsed route target");
    Some(destination)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn kind_for_keyword(word: &str) -> DestinationKind {
    let word = word.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|fragment| word.contains(fragment)))
        .map_or(DestinationKind::UnknownType, |(_, kind)| *kind)
}

fn digits<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn optional_space(input: &mut Input<'_>) -> IResult<()> {
    opt(one_of(|c: char| c.is_whitespace()))
        .void()
        .parse_next(input)
}

/// `Word(1234 ...)`; anything after the digit run is ignored.
fn typed_reference(input: &mut Input<'_>) -> IResult<Destination> {
    (
        take_while(1.., is_word_char),
        optional_space,
        '(',
        optional_space,
        digits,
    )
        .map(|(word, _, _, _, number)| Destination::new(kind_for_keyword(word), number))
        .parse_next(input)
}

/// `8020 Sales`: at least three digits followed by whitespace.
fn labeled_number(input: &mut Input<'_>) -> IResult<Destination> {
    terminated(
        take_while(3.., |c: char| c.is_ascii_digit()),
        take_while(1.., |c: char| c.is_whitespace()),
    )
    .map(|number| Destination::new(DestinationKind::ExtensionNumber, number))
    .parse_next(input)
}

/// Whole-text action keywords, matched case-insensitively.
fn action(input: &mut Input<'_>) -> IResult<Destination> {
    terminated(
        alt((
            literal(Caseless("end call")).value(DestinationKind::EndCall),
            literal(Caseless("repeat prompt")).value(DestinationKind::Repeat),
            literal(Caseless("accept anyway")).value(DestinationKind::Accept),
        )),
        eof,
    )
    .map(|kind| {
        let canonical = match kind {
            DestinationKind::EndCall => "End Call",
            DestinationKind::Repeat => "Repeat Prompt",
            _ => "Accept Anyway",
        };
        Destination::new(kind, canonical)
    })
    .parse_next(input)
}

/// `+` followed by digits and spaces, with at least one digit.
fn external_number(input: &mut Input<'_>) -> IResult<Destination> {
    (
        '+',
        take_while(0.., |c: char| c.is_ascii_digit() || c == ' ')
            .verify(|number: &str| number.chars().any(|c| c.is_ascii_digit())),
        eof,
    )
        .take()
        .map(|number| Destination::new(DestinationKind::External, number))
        .parse_next(input)
}

fn bare_number(input: &mut Input<'_>) -> IResult<Destination> {
    terminated(digits, eof)
        .map(|number| Destination::new(DestinationKind::ExtensionNumber, number))
        .parse_next(input)
}
