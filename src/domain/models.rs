// src/domain/models.rs
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Menu Components
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NutritionInfo {
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub allergens: Vec<String>,
}

/// An orderable item as served by the catalog. Never mutated client-side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, rename = "nutritionalInfo")]
    pub nutrition: Option<NutritionInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuCategory {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Category name -> items, in the order the backend listed them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    categories: Vec<MenuCategory>,
}

impl Catalog {
    pub fn new(categories: Vec<MenuCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn category(&self, name: &str) -> Option<&[MenuItem]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.items.as_slice())
    }

    pub fn find_item(&self, id: &str) -> Option<&MenuItem> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to menu items")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
                let mut categories = Vec::new();
                while let Some((name, items)) = access.next_entry::<String, Vec<MenuItem>>()? {
                    categories.push(MenuCategory { name, items });
                }
                Ok(Catalog { categories })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// One cart entry. Name and price are copied from the menu item when the
/// line is created and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order Components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Payload of one submission attempt; also the wire body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
}

/// The backend's record of a submitted order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct PlacedOrder {
    pub id: String,
    pub customer_name: String,
    pub phone_number: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Stored order as it comes off the wire. Document stores send `_id`;
/// some also add an `id` copy, which takes precedence.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    document_id: Option<String>,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    items: Vec<OrderItem>,
    #[serde(default)]
    total_amount: Decimal,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRecord> for PlacedOrder {
    type Error = String;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .or(record.document_id)
            .ok_or_else(|| "order record without `id` or `_id`".to_string())?;

        Ok(PlacedOrder {
            id,
            customer_name: record.customer_name,
            phone_number: record.phone_number,
            notes: record.notes,
            items: record.items,
            total_amount: record.total_amount,
            status: record.status,
            created_at: record.created_at,
        })
    }
}

/// Fulfilment tag. The vocabulary belongs to the backend, so unknown
/// values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Danger,
    Warning,
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Raw tag with its first letter capitalised
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            OrderStatus::Completed => StatusTone::Success,
            OrderStatus::Cancelled => StatusTone::Danger,
            _ => StatusTone::Warning,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => OrderStatus::Pending,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
