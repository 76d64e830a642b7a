//! The demo record type and its built-in sample data.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sifter::Filterable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Filterable)]
#[serde(rename_all = "PascalCase")]
#[filter(rename_all = "PascalCase")]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub age: Option<i32>,
    pub birth_date: Option<NaiveDateTime>,
    pub address: String,
}

fn born(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Four customers, two of them aged 30.
pub fn sample() -> Vec<Customer> {
    vec![
        Customer {
            id: 1,
            name: "John Doe".into(),
            age: Some(30),
            birth_date: born(1994, 5, 12),
            address: "123 Main St".into(),
        },
        Customer {
            id: 2,
            name: "Jane Smith".into(),
            age: Some(25),
            birth_date: None,
            address: "456 Elm St".into(),
        },
        Customer {
            id: 3,
            name: "Mike Johnson".into(),
            age: Some(40),
            birth_date: born(1984, 11, 2),
            address: "789 Oak St".into(),
        },
        Customer {
            id: 4,
            name: "Alice Cooper".into(),
            age: Some(30),
            birth_date: born(1994, 2, 20),
            address: "321 Pine St".into(),
        },
    ]
}
