// src/domain/cart.rs
use rust_decimal::Decimal;

use crate::domain::models::{CartLine, MenuItem};

/// The customer's cart.
///
/// Lines are kept in insertion order with at most one line per item id and
/// every quantity >= 1. The total is never stored; it is always the sum of
/// the line subtotals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Adds one unit of `item`, creating the line if needed.
    pub fn add_item(&mut self, item: &MenuItem) -> &CartLine {
        let index = match self.position(&item.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = line.quantity.saturating_add(1);
                index
            }
            None => {
                self.lines.push(CartLine::from_item(item));
                self.lines.len() - 1
            }
        };
        &self.lines[index]
    }

    /// Sets a line's quantity; zero or below removes the line.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(index) = self.position(id) {
            self.lines[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn remove_item(&mut self, id: &str) {
        self.lines.retain(|line| line.id != id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Removes what an order took out of the cart.
    ///
    /// If the cart is unchanged since `submitted` was captured it is simply
    /// cleared. Otherwise the submitted quantities are subtracted line by
    /// line, so anything added while the order was in flight stays.
    pub fn settle(&mut self, submitted: &[CartLine]) {
        if self.lines.as_slice() == submitted {
            self.clear();
            return;
        }

        for taken in submitted {
            if let Some(index) = self.position(&taken.id) {
                let line = &mut self.lines[index];
                if line.quantity <= taken.quantity {
                    self.lines.remove(index);
                } else {
                    line.quantity -= taken.quantity;
                }
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, price: Decimal) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            price,
            description: None,
            image_url: None,
            nutrition: None,
        }
    }

    fn assert_total_consistent(cart: &Cart) {
        let expected: Decimal = cart
            .lines()
            .iter()
            .map(|l| l.price * Decimal::from(l.quantity))
            .sum();
        assert_eq!(cart.total(), expected);
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn test_adding_same_item_twice_increments_quantity() {
        let mut cart = Cart::new();
        let dosa = item("x", dec!(100));

        cart.add_item(&dosa);
        let line = cart.add_item(&dosa);
        assert_eq!(line.quantity, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), dec!(200));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&item("c", dec!(30)));
        cart.add_item(&item("a", dec!(10)));
        cart.add_item(&item("b", dec!(20)));
        cart.add_item(&item("a", dec!(10)));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_price_is_snapshotted_at_add_time() {
        let mut cart = Cart::new();
        let mut tea = item("t", dec!(15));
        cart.add_item(&tea);

        tea.price = dec!(25);
        cart.add_item(&tea);

        let line = cart.line("t").unwrap();
        assert_eq!(line.price, dec!(15));
        assert_eq!(cart.total(), dec!(30));
    }

    #[test]
    fn test_update_quantity_to_zero_or_negative_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", dec!(10)));
        cart.add_item(&item("b", dec!(20)));

        cart.update_quantity("a", 0);
        assert!(cart.line("a").is_none());

        cart.update_quantity("b", -1);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", dec!(10)));
        let before = cart.clone();

        cart.update_quantity("ghost", 4);
        cart.remove_item("ghost");

        assert_eq!(cart, before);
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = Cart::new();
        let a = item("a", dec!(12.50));
        let b = item("b", dec!(7.25));
        let c = item("c", dec!(99));

        cart.add_item(&a);
        assert_total_consistent(&cart);
        cart.add_item(&b);
        assert_total_consistent(&cart);
        cart.update_quantity("a", 5);
        assert_total_consistent(&cart);
        cart.add_item(&c);
        assert_total_consistent(&cart);
        cart.update_quantity("b", 0);
        assert_total_consistent(&cart);
        cart.remove_item("c");
        assert_total_consistent(&cart);
        cart.add_item(&b);
        assert_total_consistent(&cart);

        assert_eq!(cart.total(), dec!(69.75));
        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_huge_quantity_saturates() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", dec!(1)));
        cart.update_quantity("a", i64::MAX);
        assert_eq!(cart.line("a").unwrap().quantity, u32::MAX);
        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_settle_unchanged_cart_clears_everything() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", dec!(10)));
        cart.add_item(&item("b", dec!(20)));
        let snapshot = cart.lines().to_vec();

        cart.settle(&snapshot);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_settle_keeps_what_was_added_in_flight() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", dec!(10)));
        cart.add_item(&item("b", dec!(20)));
        let snapshot = cart.lines().to_vec();

        // edits made while the order was being placed
        cart.add_item(&item("a", dec!(10)));
        cart.add_item(&item("c", dec!(5)));
        cart.remove_item("b");

        cart.settle(&snapshot);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(cart.line("a").unwrap().quantity, 1);
        assert_eq!(cart.total(), dec!(15));
    }
}
