//! Built-in furniture table

use super::{CatalogEntry, Category, Dimensions};

struct Item {
    id: &'static str,
    name: &'static str,
    category: Category,
    dims: Dimensions,
    color: &'static str,
    model: &'static str,
    model_scale: f32,
    boost: f32,
    floor_aligned: bool,
}

const ITEMS: &[Item] = &[
    Item {
        id: "chair-1",
        name: "Dining Chair",
        category: Category::Chairs,
        dims: Dimensions::new(45.0, 50.0, 90.0),
        color: "#8B4513",
        model: "models/dining_chair.obj",
        model_scale: 1.0,
        boost: 1.0,
        floor_aligned: false,
    },
    Item {
        id: "chair-2",
        name: "Office Chair",
        category: Category::Chairs,
        dims: Dimensions::new(60.0, 65.0, 110.0),
        color: "#000000",
        model: "models/office_chair.obj",
        model_scale: 1.0,
        boost: 1.0,
        floor_aligned: false,
    },
    Item {
        id: "chair-3",
        name: "Lounge Chair",
        category: Category::Chairs,
        dims: Dimensions::new(70.0, 80.0, 85.0),
        color: "#D2B48C",
        model: "models/lounge_chair.obj",
        model_scale: 1.3,
        boost: 2.0,
        floor_aligned: false,
    },
    Item {
        id: "table-1",
        name: "Dining Table Set",
        category: Category::Tables,
        dims: Dimensions::new(180.0, 90.0, 75.0),
        color: "#8B4513",
        model: "models/simple_dining_table.obj",
        model_scale: 1.0,
        boost: 2.0,
        floor_aligned: false,
    },
    Item {
        id: "table-2",
        name: "Coffee Table",
        category: Category::Tables,
        dims: Dimensions::new(120.0, 60.0, 45.0),
        color: "#5C4033",
        model: "models/coffee_table.obj",
        model_scale: 1.0,
        boost: 1.0,
        floor_aligned: false,
    },
    Item {
        id: "sofa-1",
        name: "3-Seater Sofa",
        category: Category::Sofas,
        dims: Dimensions::new(220.0, 95.0, 85.0),
        color: "#808080",
        model: "models/3_seater.obj",
        model_scale: 1.0,
        boost: 2.0,
        floor_aligned: false,
    },
    Item {
        id: "cabinet-1",
        name: "Bookshelf",
        category: Category::Cabinets,
        dims: Dimensions::new(80.0, 40.0, 200.0),
        color: "#8B4513",
        model: "models/bookshelf.obj",
        model_scale: 1.0,
        boost: 2.0,
        floor_aligned: false,
    },
    Item {
        id: "cabinet-2",
        name: "TV Stand",
        category: Category::Cabinets,
        dims: Dimensions::new(160.0, 45.0, 55.0),
        color: "#5C4033",
        model: "models/tv_stand.obj",
        model_scale: 1.0,
        boost: 2.0,
        floor_aligned: false,
    },
    Item {
        id: "bed-1",
        name: "Queen Bed",
        category: Category::Beds,
        dims: Dimensions::new(160.0, 210.0, 45.0),
        color: "#8B4513",
        model: "models/bed.obj",
        model_scale: 1.0,
        boost: 4.0,
        floor_aligned: true,
    },
];

/// Build the owned catalog entries for the built-in furniture
pub fn builtin_furniture() -> Vec<CatalogEntry> {
    ITEMS
        .iter()
        .map(|item| CatalogEntry {
            id: item.id.to_string(),
            name: item.name.to_string(),
            category: item.category,
            dimensions: item.dims,
            default_color: item.color.to_string(),
            model: Some(item.model.to_string()),
            model_scale: item.model_scale,
            visual_boost: item.boost,
            floor_aligned_origin: item.floor_aligned,
        })
        .collect()
}
