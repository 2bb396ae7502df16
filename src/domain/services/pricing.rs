use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::max;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub nights: i64,
    pub total_amount: i64,
}

/// Night count for a stay. Floors to 1 for same-day and inverted ranges;
/// invoicing counts a minimum of one night, so the floor stays even though
/// the workflow refuses inverted ranges before payment.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    max(1, (check_out - check_in).num_days())
}

pub fn quote(rate: i64, check_in: NaiveDate, check_out: NaiveDate) -> Quote {
    let nights = nights_between(check_in, check_out);
    Quote {
        nights,
        total_amount: rate * nights,
    }
}

pub fn quote_catering(price_per_plate: i64, plates: i32, check_in: NaiveDate, check_out: NaiveDate) -> Quote {
    let nights = nights_between(check_in, check_out);
    Quote {
        nights,
        total_amount: price_per_plate * plates as i64 * nights,
    }
}
