use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price in pence
    pub price: u64,
    pub stock: u32,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub height: String,
    pub width: String,
    pub depth: String,
    pub weight: String,
    pub color: String,
    pub material: String,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Case-insensitive search over the descriptive fields of the product.
    /// A blank query matches every product.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&self.name, &self.description, &self.color, &self.material]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Catalog written in a fresh data directory
pub fn default_catalog() -> Vec<Product> {
    #[allow(clippy::too_many_arguments)]
    fn product(
        id: &str,
        name: &str,
        description: &str,
        price: u64,
        stock: u32,
        dimensions: (&str, &str, &str),
        weight: &str,
        color: &str,
        material: &str,
    ) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
            image_urls: vec![format!("https://picsum.photos/seed/{id}/600")],
            height: dimensions.0.into(),
            width: dimensions.1.into(),
            depth: dimensions.2.into(),
            weight: weight.into(),
            color: color.into(),
            material: material.into(),
        }
    }
    vec![
        product(
            "p1",
            "Oslo Armchair",
            "A low lounge chair with a solid frame and a deep, comfortable seat.",
            34900,
            4,
            ("78cm", "72cm", "80cm"),
            "14kg",
            "Oak",
            "Wood",
        ),
        product(
            "p2",
            "Bergen Side Table",
            "Compact round side table, perfect next to a sofa or a bed.",
            8900,
            12,
            ("55cm", "45cm", "45cm"),
            "5kg",
            "Black",
            "Steel",
        ),
        product(
            "p3",
            "Fjord Floor Lamp",
            "Adjustable floor lamp with a linen shade and a warm dimmable light.",
            12500,
            7,
            ("160cm", "40cm", "40cm"),
            "6kg",
            "Natural",
            "Linen",
        ),
        product(
            "p4",
            "Tromso Sofa",
            "Three-seater sofa with removable and washable covers.",
            89900,
            2,
            ("85cm", "220cm", "95cm"),
            "58kg",
            "Grey",
            "Fabric",
        ),
        product(
            "p5",
            "Lofoten Rug",
            "Hand-woven wool rug with a subtle geometric pattern.",
            19900,
            0,
            ("1cm", "200cm", "300cm"),
            "9kg",
            "Cream",
            "Wool",
        ),
        product(
            "p6",
            "Narvik Bookcase",
            "Five-shelf bookcase with adjustable shelves.",
            15900,
            5,
            ("180cm", "80cm", "30cm"),
            "32kg",
            "White",
            "Wood",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        default_catalog()
            .into_iter()
            .find(|p| &*p.id == "p3")
            .expect("lamp in catalog")
    }

    #[test]
    fn blank_query_matches_everything() {
        assert!(lamp().matches_query(""));
        assert!(lamp().matches_query("   "));
    }

    #[test]
    fn query_is_case_insensitive_and_trimmed() {
        assert!(lamp().matches_query("  FLOOR "));
        assert!(lamp().matches_query("linen"));
        assert!(lamp().matches_query("natural"));
        assert!(!lamp().matches_query("sofa"));
    }

    #[test]
    fn default_catalog_ids_are_unique() {
        let catalog = default_catalog();
        let mut ids = catalog.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.iter().any(|p| !p.in_stock()));
    }
}
