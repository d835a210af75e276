#![allow(dead_code)]

use highlight_export_core::model::{Quote, Work};

pub fn work(uuid: &str, title: &str) -> Work {
    Work {
        uuid: uuid.to_string(),
        title: title.to_string(),
        authors: vec!["Jane Doe".to_string()],
        state: Some("finished".to_string()),
    }
}

pub fn quote(uuid: &str, work: Option<&Work>, color: i64, comment: Option<&str>) -> Quote {
    Quote {
        uuid: uuid.to_string(),
        book: work.cloned(),
        color,
        content: format!("Passage {uuid}"),
        comment: comment.map(str::to_string),
        created_at: 1675580645,
    }
}

/// Two quotes for "Foo" (the second with a comment) and one for "Bar".
pub fn sample_quotes() -> Vec<Quote> {
    let foo = work("W1", "Foo");
    let bar = work("W2", "Bar");
    vec![
        quote("q1", Some(&foo), 0, None),
        quote("q3", Some(&bar), 4, None),
        quote("q2", Some(&foo), 2, Some("nice")),
    ]
}
