//! The canonical ballot layout.
//!
//! One line per candidate slot, in candidate order, each terminated by `\n`.
//! A modular ciphertext is written `c1_c2` and a curve ciphertext
//! `R.x_R.y_C.x_C.y`, all in decimal. Ballot signatures cover exactly these
//! bytes, so the layout must not drift.

use num_bigint::BigUint;

use crate::encryption::Ciphertext;
use crate::error::{Error, Result};
use crate::group::p256_impl::point_fields;
use crate::group::{CyclicGroup, DomainParameters};

const FIELD_SEPARATOR: &str = "_";
const LINE_TERMINATOR: char = '\n';

/// Write the ciphertexts in the canonical layout.
pub fn serialize(ciphertexts: &[Ciphertext]) -> Vec<u8> {
    let mut out = String::new();
    for ciphertext in ciphertexts {
        let fields = match ciphertext {
            Ciphertext::Modular { c1, c2 } => vec![c1.clone(), c2.clone()],
            Ciphertext::Curve { r, c } => point_fields(r)
                .into_iter()
                .chain(point_fields(c))
                .collect(),
        };
        let line = fields
            .iter()
            .map(BigUint::to_string)
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR);
        out.push_str(&line);
        out.push(LINE_TERMINATOR);
    }
    out.into_bytes()
}

/// Parse the canonical layout, expecting exactly `candidate_count` lines.
pub fn deserialize(
    params: &DomainParameters,
    bytes: &[u8],
    candidate_count: usize,
) -> Result<Vec<Ciphertext>> {
    let text = std::str::from_utf8(bytes).map_err(|_| malformed("not valid UTF-8"))?;
    if !text.is_empty() && !text.ends_with(LINE_TERMINATOR) {
        return Err(malformed("last line is not terminated"));
    }
    let lines = text.split_terminator(LINE_TERMINATOR).collect::<Vec<_>>();
    if lines.len() != candidate_count {
        return Err(malformed(&format!(
            "expected {candidate_count} lines, found {}",
            lines.len()
        )));
    }

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| -> Result<Ciphertext> {
            let fields = line
                .split(FIELD_SEPARATOR)
                .map(parse_decimal)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| malformed(&format!("line {index}: bad integer field")))?;
            match params {
                DomainParameters::Modular(group) => {
                    let (c1, c2) = parse_pair(group, &fields, index)?;
                    Ok(Ciphertext::Modular { c1, c2 })
                }
                DomainParameters::Curve(group) => {
                    let (r, c) = parse_pair(group, &fields, index)?;
                    Ok(Ciphertext::Curve { r, c })
                }
            }
        })
        .collect()
}

/// Two group elements, `G::FIELDS` integers each.
fn parse_pair<G: CyclicGroup>(
    group: &G,
    fields: &[BigUint],
    index: usize,
) -> Result<(G::Element, G::Element)> {
    if fields.len() != 2 * G::FIELDS {
        return Err(malformed(&format!(
            "line {index}: expected {} fields, found {}",
            2 * G::FIELDS,
            fields.len()
        )));
    }
    let (first, second) = fields.split_at(G::FIELDS);
    let element = |part: &[BigUint]| {
        group
            .from_fields(part)
            .ok_or_else(|| malformed(&format!("line {index}: not a group element")))
    };
    Ok((element(first)?, element(second)?))
}

/// Plain ASCII digits without leading zeros, so every value has one spelling.
fn parse_decimal(field: &str) -> Option<BigUint> {
    let canonical = !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit())
        && (field == "0" || !field.starts_with('0'));
    if !canonical {
        return None;
    }
    BigUint::parse_bytes(field.as_bytes(), 10)
}

fn malformed(reason: &str) -> Error {
    Error::MalformedBallot(reason.to_string())
}
