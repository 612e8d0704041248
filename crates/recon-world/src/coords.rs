//! Region-name coordinates and the top-left ordering.
//!
//! Region names follow the pattern `[W|E]<horizontal>[N|S]<vertical>`. West
//! and north halves are mirrored with an offset of one so that the grid has
//! no gap at the origin:
//!
//! | Name   | x  | y  |
//! |--------|----|----|
//! | `W0N0` | -1 | -1 |
//! | `E0S0` |  0 |  0 |
//! | `W1N1` | -2 | -2 |
//! | `E2S1` |  2 |  1 |
//!
//! Names that do not match the pattern have no coordinates. They remain
//! valid region names everywhere else (graph, stores) and order
//! lexicographically.

use core::cmp::{Ordering, Reverse};
use core::iter::Peekable;
use core::str::Chars;

use recon_types::RegionName;

/// Signed grid coordinates derived from a region name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionCoords {
    /// Horizontal coordinate; west is negative.
    pub x: i32,
    /// Vertical coordinate; north is negative.
    pub y: i32,
}

/// Parse a region name into grid coordinates.
///
/// Returns `None` when the name does not match
/// `[W|E]<digits>[N|S]<digits>` exactly, or when a number overflows.
pub fn parse_region(name: &str) -> Option<RegionCoords> {
    let mut chars = name.chars().peekable();

    let horizontal = chars.next()?;
    if horizontal != 'W' && horizontal != 'E' {
        return None;
    }
    let h = take_number(&mut chars)?;

    let vertical = chars.next()?;
    if vertical != 'N' && vertical != 'S' {
        return None;
    }
    let v = take_number(&mut chars)?;

    if chars.next().is_some() {
        return None;
    }

    let x = if horizontal == 'W' { mirror(h)? } else { h };
    let y = if vertical == 'N' { mirror(v)? } else { v };
    Some(RegionCoords { x, y })
}

/// Consume one or more ASCII digits.
fn take_number(chars: &mut Peekable<Chars<'_>>) -> Option<i32> {
    let mut value: i32 = 0;
    let mut digits: u32 = 0;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = value
            .checked_mul(10)?
            .checked_add(i32::try_from(digit).ok()?)?;
        digits = digits.saturating_add(1);
    }
    (digits > 0).then_some(value)
}

/// `-value - 1`: the west/north half of the grid.
const fn mirror(value: i32) -> Option<i32> {
    (-1_i32).checked_sub(value)
}

/// Build the region name for a pair of grid coordinates.
///
/// Inverse of [`parse_region`] for every coordinate pair.
pub fn region_name(coords: RegionCoords) -> RegionName {
    let (horizontal, h) = if coords.x < 0 {
        ('W', (-1_i32).saturating_sub(coords.x))
    } else {
        ('E', coords.x)
    };
    let (vertical, v) = if coords.y < 0 {
        ('N', (-1_i32).saturating_sub(coords.y))
    } else {
        ('S', coords.y)
    };
    RegionName::new(format!("{horizontal}{h}{vertical}{v}"))
}

/// Order two region names for deterministic scanning.
///
/// When both names parse: descending `y`, then ascending `x`. When either
/// fails to parse: plain lexicographic comparison.
///
/// Mixing parsable and unparsable names in one sort does not give a total
/// order; use [`top_left_key`] for sorting arbitrary name sets.
pub fn compare_by_top_left(a: &str, b: &str) -> Ordering {
    match (parse_region(a), parse_region(b)) {
        (Some(pa), Some(pb)) => pb.y.cmp(&pa.y).then_with(|| pa.x.cmp(&pb.x)),
        _ => a.cmp(b),
    }
}

/// Total sort key that agrees with [`compare_by_top_left`] whenever both
/// names parse or both names do not.
///
/// Parsable names sort before unparsable ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TopLeftKey<'a> {
    /// A name with coordinates.
    Coords {
        /// Descending `y`.
        y: Reverse<i32>,
        /// Ascending `x`.
        x: i32,
        /// Tie-break for names that spell the same coordinates differently.
        name: &'a str,
    },
    /// A name without coordinates.
    Opaque(&'a str),
}

/// Compute the [`TopLeftKey`] for a region name.
pub fn top_left_key(name: &str) -> TopLeftKey<'_> {
    parse_region(name).map_or(TopLeftKey::Opaque(name), |coords| TopLeftKey::Coords {
        y: Reverse(coords.y),
        x: coords.x,
        name,
    })
}

/// Linear (Chebyshev) distance in regions between two names.
///
/// Returns `None` if either name has no coordinates.
pub fn linear_distance(a: &str, b: &str) -> Option<u32> {
    let pa = parse_region(a)?;
    let pb = parse_region(b)?;
    Some(pa.x.abs_diff(pb.x).max(pa.y.abs_diff(pb.y)))
}
