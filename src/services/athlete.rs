//! Athlete profile helpers.

use crate::models::{Athlete, Cell, Table};
use crate::units;

/// One-line description of the athlete for logs.
pub fn describe_athlete(athlete: &Athlete) -> String {
    format!(
        "Athlete's name is {} {}, based in {}, {}",
        athlete.firstname,
        athlete.lastname,
        athlete.city.as_deref().unwrap_or(""),
        athlete.country.as_deref().unwrap_or(""),
    )
}

/// Table of shoe name and mileage (km), one row per shoe.
pub fn shoe_mileage_table(athlete: &Athlete) -> Table {
    let mut table = Table::new(["name", "mileage"]);
    for shoe in &athlete.shoes {
        let mileage = shoe
            .converted_distance
            .unwrap_or_else(|| units::meters_to_km(shoe.distance));
        table.push_row(vec![Cell::Text(shoe.name.clone()), Cell::Float(mileage)]);
    }
    table
}
