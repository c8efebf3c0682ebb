//! Progressive match-criteria generation.
//!
//! A defendant lookup starts with the tightest filters and loosens step by
//! step. Two independent sequences exist:
//!
//! | Exact | Partial |
//! |-------|---------|
//! | pncId + lastName (per PNC spelling) | pncId (per PNC spelling) |
//! | croNumber + lastName | croNumber |
//! | lastName + firstName + dateOfBirth + address1 | lastName + address1 + dateOfBirth |
//! | | lastName + dateOfBirth |
//! | | address1 + dateOfBirth |
//!
//! A shape whose fields are not all present is skipped. The walk itself is a
//! pure function over a [`Cursor`]; [`MatchCriteriaGenerator`] wraps it with
//! per-sequence cursors for callers that pull one criteria object at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Defendant;

use super::criteria::{
    MatchCriteria, ADDRESS1, CRO_NUMBER, DATE_OF_BIRTH, DEFAULT_PAGE_SIZE, FIRST_NAME, LAST_NAME,
    PNC_ID,
};
use super::pnc::pnc_candidates;

/// One criteria shape: the fields it needs and renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    PncIdLastName,
    CroNumberLastName,
    FullIdentity,
    PncId,
    CroNumber,
    LastNameAddressDateOfBirth,
    LastNameDateOfBirth,
    AddressDateOfBirth,
}

/// Exact shapes in lookup order
pub const EXACT_SHAPES: [Shape; 3] = [
    Shape::PncIdLastName,
    Shape::CroNumberLastName,
    Shape::FullIdentity,
];

/// Partial shapes in lookup order
pub const PARTIAL_SHAPES: [Shape; 5] = [
    Shape::PncId,
    Shape::CroNumber,
    Shape::LastNameAddressDateOfBirth,
    Shape::LastNameDateOfBirth,
    Shape::AddressDateOfBirth,
];

impl Shape {
    /// Every criteria object this shape yields for the defendant, in order.
    /// Empty when the shape's fields are not all present.
    pub fn render(self, defendant: &Defendant, baseline: &MatchCriteria) -> Vec<MatchCriteria> {
        let base = || baseline.clone();

        match self {
            Self::PncIdLastName => match (defendant.pnc_id(), defendant.last_name()) {
                (Some(pnc), Some(last)) => pnc_candidates(pnc)
                    .into_iter()
                    .map(|p| base().with(PNC_ID, &p).with(LAST_NAME, last))
                    .collect(),
                _ => Vec::new(),
            },
            Self::CroNumberLastName => match (defendant.cro_number(), defendant.last_name()) {
                (Some(cro), Some(last)) => vec![base().with(CRO_NUMBER, cro).with(LAST_NAME, last)],
                _ => Vec::new(),
            },
            Self::FullIdentity => match (
                defendant.last_name(),
                defendant.first_name(),
                defendant.date_of_birth(),
                defendant.address1(),
            ) {
                (Some(last), Some(first), Some(dob), Some(address1)) => vec![base()
                    .with(LAST_NAME, last)
                    .with(FIRST_NAME, first)
                    .with_date(DATE_OF_BIRTH, dob)
                    .with(ADDRESS1, address1)],
                _ => Vec::new(),
            },
            Self::PncId => defendant
                .pnc_id()
                .map(pnc_candidates)
                .unwrap_or_default()
                .into_iter()
                .map(|p| base().with(PNC_ID, &p))
                .collect(),
            Self::CroNumber => defendant
                .cro_number()
                .map(|cro| vec![base().with(CRO_NUMBER, cro)])
                .unwrap_or_default(),
            Self::LastNameAddressDateOfBirth => match (
                defendant.last_name(),
                defendant.address1(),
                defendant.date_of_birth(),
            ) {
                (Some(last), Some(address1), Some(dob)) => vec![base()
                    .with(LAST_NAME, last)
                    .with(ADDRESS1, address1)
                    .with_date(DATE_OF_BIRTH, dob)],
                _ => Vec::new(),
            },
            Self::LastNameDateOfBirth => match (defendant.last_name(), defendant.date_of_birth()) {
                (Some(last), Some(dob)) => vec![base()
                    .with(LAST_NAME, last)
                    .with_date(DATE_OF_BIRTH, dob)],
                _ => Vec::new(),
            },
            Self::AddressDateOfBirth => match (defendant.address1(), defendant.date_of_birth()) {
                (Some(address1), Some(dob)) => vec![base()
                    .with(ADDRESS1, address1)
                    .with_date(DATE_OF_BIRTH, dob)],
                _ => Vec::new(),
            },
        }
    }
}

/// Position of the next criteria to try: shape, then sub-step within it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub shape_index: usize,
    pub sub_index: usize,
}

/// Find the next criteria at or after `cursor`, returning it with the cursor
/// for the step after it. `None` once every shape is exhausted.
pub fn advance(
    shapes: &[Shape],
    cursor: Cursor,
    defendant: &Defendant,
    baseline: &MatchCriteria,
) -> Option<(MatchCriteria, Cursor)> {
    let mut cursor = cursor;

    while let Some(shape) = shapes.get(cursor.shape_index) {
        if let Some(criteria) = shape
            .render(defendant, baseline)
            .into_iter()
            .nth(cursor.sub_index)
        {
            debug!(?shape, sub_index = cursor.sub_index, "Match criteria generated");
            let next = Cursor {
                shape_index: cursor.shape_index,
                sub_index: cursor.sub_index + 1,
            };
            return Some((criteria, next));
        }

        cursor = Cursor {
            shape_index: cursor.shape_index + 1,
            sub_index: 0,
        };
    }

    None
}

/// Which sequence to walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Exact,
    Partial,
}

impl MatchMode {
    pub fn shapes(self) -> &'static [Shape] {
        match self {
            Self::Exact => &EXACT_SHAPES,
            Self::Partial => &PARTIAL_SHAPES,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Track {
    cursor: Cursor,
    current: Option<MatchCriteria>,
}

impl Track {
    fn step(&mut self, mode: MatchMode, defendant: &Defendant, baseline: &MatchCriteria) -> bool {
        match advance(mode.shapes(), self.cursor, defendant, baseline) {
            Some((criteria, next)) => {
                self.cursor = next;
                self.current = Some(criteria);
                true
            }
            None => {
                self.cursor = Cursor {
                    shape_index: mode.shapes().len(),
                    sub_index: 0,
                };
                self.current = None;
                false
            }
        }
    }
}

/// Stateful generator for one defendant lookup.
///
/// Holds an independent cursor for the exact and the partial sequence. Not
/// shareable: create one per defendant and drop it when the lookup is done.
#[derive(Debug, Clone)]
pub struct MatchCriteriaGenerator {
    defendant: Defendant,
    baseline: MatchCriteria,
    exact: Track,
    partial: Track,
}

impl MatchCriteriaGenerator {
    /// Generator whose criteria are valid on `today`
    pub fn new(defendant: Defendant, today: NaiveDate) -> Self {
        Self::with_page_size(defendant, today, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(defendant: Defendant, today: NaiveDate, page_size: u32) -> Self {
        Self {
            defendant,
            baseline: MatchCriteria::baseline(today, page_size),
            exact: Track::default(),
            partial: Track::default(),
        }
    }

    /// Generator dated with the local clock
    pub fn for_today(defendant: Defendant) -> Self {
        Self::new(defendant, chrono::Local::now().date_naive())
    }

    pub fn defendant(&self) -> &Defendant {
        &self.defendant
    }

    /// Advance the exact sequence. `false` once it is exhausted.
    pub fn next_exact_criteria(&mut self) -> bool {
        self.exact
            .step(MatchMode::Exact, &self.defendant, &self.baseline)
    }

    /// Criteria produced by the last successful [`Self::next_exact_criteria`]
    pub fn exact_criteria(&self) -> Option<&MatchCriteria> {
        self.exact.current.as_ref()
    }

    /// Advance the partial sequence. `false` once it is exhausted.
    pub fn next_partial_criteria(&mut self) -> bool {
        self.partial
            .step(MatchMode::Partial, &self.defendant, &self.baseline)
    }

    /// Criteria produced by the last successful [`Self::next_partial_criteria`]
    pub fn partial_criteria(&self) -> Option<&MatchCriteria> {
        self.partial.current.as_ref()
    }

    /// The whole exact sequence from the start, independent of the cursors
    pub fn exact(&self) -> CriteriaIter<'_> {
        self.iter(MatchMode::Exact)
    }

    /// The whole partial sequence from the start, independent of the cursors
    pub fn partial(&self) -> CriteriaIter<'_> {
        self.iter(MatchMode::Partial)
    }

    pub fn iter(&self, mode: MatchMode) -> CriteriaIter<'_> {
        CriteriaIter {
            shapes: mode.shapes(),
            cursor: Some(Cursor::default()),
            defendant: &self.defendant,
            baseline: &self.baseline,
        }
    }
}

/// Iterator over one criteria sequence
#[derive(Debug, Clone)]
pub struct CriteriaIter<'a> {
    shapes: &'static [Shape],
    cursor: Option<Cursor>,
    defendant: &'a Defendant,
    baseline: &'a MatchCriteria,
}

impl Iterator for CriteriaIter<'_> {
    type Item = MatchCriteria;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor?;
        match advance(self.shapes, cursor, self.defendant, self.baseline) {
            Some((criteria, next)) => {
                self.cursor = Some(next);
                Some(criteria)
            }
            None => {
                self.cursor = None;
                None
            }
        }
    }
}
