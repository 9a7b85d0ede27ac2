//! Sample crime-report data shared by the test suites.
//!
//! Layout:
//! - schema `crime` (id 1) with fields `crime-type` (lookup), `arrested`
//!   (bool), `description` (searchable text), `beat` (int)
//! - schema `permits` (id 2) with field `permit-kind`
//! - location types `neighborhoods` (two public, one private) and `wards`
//!   (private only)
//! - blocks `main-st 100-199` (single city) and `springfield/elm-st 200-299n`

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::memory::MemoryCatalog;
use crate::model::{
    AttributeValue, Block, FieldKind, Location, LocationType, Lookup, NewsItem, Point, Schema,
    SchemaField,
};

pub fn schema() -> Schema {
    Schema {
        id: 1,
        slug: "crime".to_string(),
        name: "crime report".to_string(),
        plural_name: "crime reports".to_string(),
        date_name: "date reported".to_string(),
    }
}

pub fn permits_schema() -> Schema {
    Schema {
        id: 2,
        slug: "permits".to_string(),
        name: "building permit".to_string(),
        plural_name: "building permits".to_string(),
        date_name: "issue date".to_string(),
    }
}

fn make_field(
    id: i64,
    schema_id: i64,
    slug: &str,
    pretty: &str,
    plural: &str,
    kind: FieldKind,
    is_searchable: bool,
) -> SchemaField {
    SchemaField {
        id,
        schema_id,
        name: slug.replace('-', "_"),
        slug: slug.to_string(),
        pretty_name: pretty.to_string(),
        pretty_name_plural: plural.to_string(),
        kind,
        is_searchable,
    }
}

pub fn fields() -> Vec<SchemaField> {
    vec![
        make_field(10, 1, "crime-type", "crime type", "crime types", FieldKind::Lookup, false),
        make_field(11, 1, "arrested", "arrested", "led to an arrest", FieldKind::Bool, false),
        make_field(12, 1, "description", "description", "descriptions", FieldKind::Text, true),
        make_field(13, 1, "beat", "beat", "beats", FieldKind::Int, false),
        make_field(20, 2, "permit-kind", "permit kind", "permit kinds", FieldKind::Varchar, false),
    ]
}

/// A field of the sample data by slug. Panics on unknown slugs.
pub fn field(slug: &str) -> SchemaField {
    fields()
        .into_iter()
        .find(|f| f.slug == slug)
        .unwrap_or_else(|| panic!("no fixture field {slug}"))
}

pub fn lookups() -> Vec<Lookup> {
    [(100, "burglary", "Burglary"), (101, "theft", "Theft"), (102, "arson", "Arson")]
        .into_iter()
        .map(|(id, slug, name)| Lookup {
            id,
            schema_field_id: 10,
            slug: slug.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn neighborhoods() -> LocationType {
    LocationType {
        slug: "neighborhoods".to_string(),
        name: "neighborhood".to_string(),
        plural_name: "neighborhoods".to_string(),
    }
}

pub fn wards() -> LocationType {
    LocationType {
        slug: "wards".to_string(),
        name: "ward".to_string(),
        plural_name: "wards".to_string(),
    }
}

pub fn locations() -> Vec<Location> {
    let located = |id, slug: &str, name: &str, location_type: LocationType, is_public, order| {
        Location {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
            location_type,
            is_public,
            display_order: order,
        }
    };
    vec![
        located(1, "downtown", "Downtown", neighborhoods(), true, 2),
        located(2, "riverside", "Riverside", neighborhoods(), true, 1),
        located(3, "old-mill", "Old Mill", neighborhoods(), false, 0),
        located(4, "ward-9", "Ward 9", wards(), false, 0),
    ]
}

/// A location of the sample data by slug. Panics on unknown slugs.
pub fn location(slug: &str) -> Location {
    locations()
        .into_iter()
        .find(|l| l.slug == slug)
        .unwrap_or_else(|| panic!("no fixture location {slug}"))
}

pub fn blocks() -> Vec<Block> {
    vec![
        Block {
            id: 50,
            city: String::new(),
            street_slug: "main-st".to_string(),
            pretty_name: "100-199 Main St.".to_string(),
            from_num: 100,
            to_num: 199,
            predir: String::new(),
            centroid: Point::new(0.0, 0.0),
        },
        Block {
            id: 51,
            city: "springfield".to_string(),
            street_slug: "elm-st".to_string(),
            pretty_name: "200-299 N Elm St.".to_string(),
            from_num: 200,
            to_num: 299,
            predir: "N".to_string(),
            centroid: Point::new(1.0, 1.0),
        },
    ]
}

pub fn catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    for f in fields() {
        catalog = catalog.with_field(f);
    }
    for l in lookups() {
        catalog = catalog.with_lookup(l);
    }
    for l in locations() {
        catalog = catalog.with_location(l);
    }
    for b in blocks() {
        catalog = catalog.with_block(b);
    }
    catalog
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_else(|| panic!("bad fixture date {y}-{m}-{d}"))
}

pub fn items() -> Vec<NewsItem> {
    let crime = |id: i64,
                 item_date: NaiveDate,
                 point: Point,
                 location_ids: Vec<i64>,
                 attrs: Vec<(&str, AttributeValue)>| NewsItem {
        id,
        schema_id: 1,
        title: format!("Crime report #{id}"),
        item_date,
        pub_date: item_date.succ_opt().unwrap_or(item_date),
        point: Some(point),
        location_ids,
        attributes: attrs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    };
    let near = Point::new(0.001, -0.001);
    let far = Point::new(0.5, 0.5);
    vec![
        crime(
            1,
            date(2020, 1, 15),
            near,
            vec![1],
            vec![
                ("crime-type", AttributeValue::Int(100)),
                ("arrested", AttributeValue::Bool(true)),
                ("description", "Broken window at the rear door".into()),
                ("beat", AttributeValue::Int(7)),
            ],
        ),
        crime(
            2,
            date(2020, 1, 31),
            near,
            vec![1],
            vec![
                ("crime-type", AttributeValue::Int(101)),
                ("arrested", AttributeValue::Bool(false)),
                ("description", "Bicycle taken from porch".into()),
                ("beat", AttributeValue::Int(7)),
            ],
        ),
        crime(
            3,
            date(2020, 2, 1),
            far,
            vec![2],
            vec![
                ("crime-type", AttributeValue::Int(100)),
                ("description", "Window broken, laptop taken".into()),
                ("beat", AttributeValue::Int(3)),
            ],
        ),
        crime(
            4,
            date(2019, 12, 31),
            Point::new(1.0, 1.0),
            vec![2],
            vec![
                ("crime-type", AttributeValue::Int(102)),
                ("arrested", AttributeValue::Bool(true)),
                ("description", "Dumpster fire behind the mill".into()),
            ],
        ),
        crime(
            5,
            date(2020, 1, 1),
            near,
            vec![1, 2],
            vec![
                ("crime-type", AttributeValue::Int(101)),
                ("arrested", AttributeValue::Null),
                ("description", "Wallet stolen near broken window display".into()),
            ],
        ),
        NewsItem {
            id: 6,
            schema_id: 2,
            title: "Permit issued".to_string(),
            item_date: date(2020, 1, 15),
            pub_date: date(2020, 1, 16),
            point: Some(near),
            location_ids: vec![1],
            attributes: [("permit-kind".to_string(), "electrical".into())]
                .into_iter()
                .collect(),
        },
    ]
}
