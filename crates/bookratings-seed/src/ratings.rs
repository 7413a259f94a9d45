//! Rating import in two phases.
//!
//! Phase A provisions every user id the source mentions, keeping the id the
//! source gives. Phase B attaches ratings to catalog records through the ISBN
//! candidate set, at most one per (user, book).

use std::collections::BTreeSet;

use bookratings_core::NewRating;

use crate::error::{Result, SeedError};
use crate::identifiers::{normalize, IsbnCandidates};
use crate::report::{RatingImportReport, RatingOutcome, RatingSkip};
use crate::source::RawRatingRow;
use crate::store::SeedStore;

pub fn import_ratings<S: SeedStore + ?Sized>(store: &S, rows: &[RawRatingRow]) -> Result<RatingImportReport> {
    let users_created = provision_users(store, rows)?;

    let mut report = RatingImportReport {
        users_created,
        ..Default::default()
    };
    for row in rows {
        let outcome = import_rating(store, row)?;
        if let RatingOutcome::Skipped(reason) = outcome {
            tracing::debug!(
                "rating row {}: skipped ({:?}) user={:?} isbn={:?} rating={:?}",
                row.line,
                reason,
                row.user_id,
                row.isbn,
                row.rating
            );
        }
        report.record(outcome);
    }

    tracing::info!("{}", report);
    Ok(report)
}

/// Phase A. Inserts the users missing from storage in one all-or-nothing
/// batch and returns how many were created.
pub fn provision_users<S: SeedStore + ?Sized>(store: &S, rows: &[RawRatingRow]) -> Result<usize> {
    let wanted: BTreeSet<i64> = rows.iter().filter_map(|r| parse_user_id(&r.user_id)).collect();
    if wanted.is_empty() {
        return Ok(0);
    }

    let wanted: Vec<i64> = wanted.into_iter().collect();
    let existing = store.existing_user_ids(&wanted)?;
    let missing: Vec<i64> = wanted.into_iter().filter(|id| !existing.contains(id)).collect();
    if missing.is_empty() {
        tracing::info!("users: all {} already present", existing.len());
        return Ok(0);
    }

    let created = store
        .insert_users_with_ids(&missing)
        .map_err(|e| SeedError::Provisioning(e.to_string()))?;
    tracing::info!("users: provisioned {} ({} already present)", created, existing.len());
    Ok(created)
}

/// Phase B for one row. Checks run in a fixed order and the first failing
/// check decides the skip reason.
fn import_rating<S: SeedStore + ?Sized>(store: &S, row: &RawRatingRow) -> Result<RatingOutcome> {
    let Some(user_id) = parse_user_id(&row.user_id) else {
        return Ok(RatingOutcome::Skipped(RatingSkip::BadUser));
    };

    let Some(isbn) = normalize(&row.isbn) else {
        return Ok(RatingOutcome::Skipped(RatingSkip::BadIsbn));
    };

    let Some(value) = parse_rating(&row.rating) else {
        return Ok(RatingOutcome::Skipped(RatingSkip::BadRating));
    };

    let candidates = IsbnCandidates::for_normalized(&isbn);
    let Some(book) = store.find_book_by_isbns(&candidates.as_strs())? else {
        return Ok(RatingOutcome::Skipped(RatingSkip::NoBook));
    };

    // Phase A covered every parseable id; a miss here means the store changed underneath us.
    if !store.user_exists(user_id)? {
        return Ok(RatingOutcome::Skipped(RatingSkip::BadUser));
    }

    if store.rating_exists(user_id, book.id)? {
        return Ok(RatingOutcome::Skipped(RatingSkip::Duplicate));
    }

    let Some(rating) = NewRating::new(user_id, book.id, value) else {
        return Ok(RatingOutcome::Skipped(RatingSkip::BadRating));
    };
    let stored = store.create_rating(rating)?;
    Ok(RatingOutcome::Added { rating_id: stored.id })
}

fn parse_user_id(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// An integer in 1..=10; anything else is a bad rating.
fn parse_rating(text: &str) -> Option<i64> {
    let value: i64 = text.trim().parse().ok()?;
    bookratings_core::RATING_RANGE.contains(&value).then_some(value)
}
