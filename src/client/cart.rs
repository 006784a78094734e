use derive_more::{Display, Error};
use crate::client::model::dish::DishView;
use crate::client::model::money::Money;
use crate::client::model::{DishId, RestaurantId};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LineItem {
    pub dish_id: DishId,
    pub name: String,
    pub final_price: Money,
    pub base_price: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub(crate) enum CartError {
    #[display("cart holds dishes from restaurant {cart}, switch restaurants before adding dishes from restaurant {dish}")]
    RestaurantMismatch { cart: RestaurantId, dish: RestaurantId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwitchOutcome {
    /// same restaurant, nothing to do
    Unchanged,
    /// selection moved, the cart was already empty
    Switched,
    /// selection moved after the user agreed to drop the cart
    Cleared,
    /// user kept the cart, selection stays on the previous restaurant
    Declined,
}

/// Ordered line items, all from `restaurant_id`.
#[derive(Debug, Default)]
pub(crate) struct Cart {
    restaurant_id: Option<RestaurantId>,
    lines: Vec<LineItem>,
}

/// What the cart view renders after every mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct CartSnapshot {
    pub restaurant_id: Option<RestaurantId>,
    pub lines: Vec<LineItem>,
    pub total: Money,
    pub submit_enabled: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.restaurant_id
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn add_item(&mut self, dish: &DishView) -> Result<(), CartError> {
        match self.restaurant_id {
            Some(cart) if cart != dish.restaurant_id && !self.lines.is_empty() => {
                Err(CartError::RestaurantMismatch { cart, dish: dish.restaurant_id })
            }
            _ => {
                self.restaurant_id = Some(dish.restaurant_id);
                self.lines.push(LineItem {
                    dish_id: dish.id,
                    name: dish.name.clone(),
                    final_price: dish.final_price,
                    base_price: dish.base_price,
                });
                Ok(())
            }
        }
    }

    /// Moves the selection to `new_id`. A non-empty cart is only dropped when
    /// `confirm` (given the number of lines at stake) returns true.
    pub fn switch_restaurant(&mut self, new_id: RestaurantId, confirm: impl FnOnce(usize) -> bool) -> SwitchOutcome {
        if self.restaurant_id == Some(new_id) {
            return SwitchOutcome::Unchanged;
        }
        if self.lines.is_empty() {
            self.restaurant_id = Some(new_id);
            return SwitchOutcome::Switched;
        }
        if !confirm(self.len()) {
            return SwitchOutcome::Declined;
        }
        self.lines.clear();
        self.restaurant_id = Some(new_id);
        SwitchOutcome::Cleared
    }

    /// Display-only sum of provisional prices.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|line| line.final_price).sum()
    }

    /// Empties the cart; the restaurant selection is kept.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn dish_ids(&self) -> Vec<DishId> {
        self.lines.iter().map(|line| line.dish_id).collect()
    }

    pub fn snapshot(&self, submitting: bool) -> CartSnapshot {
        CartSnapshot {
            restaurant_id: self.restaurant_id,
            lines: self.lines.clone(),
            total: self.total(),
            submit_enabled: !self.lines.is_empty() && !submitting,
        }
    }
}

#[cfg(test)]
pub(crate) fn dish(id: DishId, restaurant_id: RestaurantId, final_price: &str, base_price: &str) -> DishView {
    use crate::client::model::money::money;
    DishView {
        id,
        restaurant_id,
        name: format!("dish-{id}"),
        image_ref: None,
        base_price: money(base_price),
        final_price: money(final_price),
        discount_label: None,
    }
}
