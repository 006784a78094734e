use log::info;
use tokio::sync::watch;
use crate::client::api::ApiClient;
use crate::client::cart::{Cart, CartSnapshot, SwitchOutcome};
use crate::client::controller::control::Control;
use crate::client::controller::error::ClientError;
use crate::client::controller::settlement::{self, SettlementReceipt};
use crate::client::model::behavior::{ActionType, BehaviorEvent};
use crate::client::model::dish::DishView;
use crate::client::model::money::Money;
use crate::client::model::restaurant::Restaurant;
use crate::client::model::{DishId, RestaurantId, UserId};
use crate::client::pricing;
use crate::client::scheduler::behavior::BehaviorLogger;
use crate::client::state::Session;

/// Asks the user to acknowledge a destructive action.
pub(crate) trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Everything the consumer cart panel renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StorefrontView {
    pub cart: CartSnapshot,
    /// last settlement, cleared by the next cart change
    pub receipt: Option<SettlementReceipt>,
}

impl StorefrontView {
    /// The server's verified total right after an order, otherwise the provisional cart total.
    pub fn displayed_total(&self) -> Money {
        self.receipt
            .as_ref()
            .map_or(self.cart.total, |receipt| receipt.total_price)
    }
}

/// Consumer side: browse, build a cart, place orders. The single writer of its cart.
pub(crate) struct Storefront {
    api: ApiClient,
    user_id: UserId,
    cart: Cart,
    menu: Vec<DishView>,
    submit: Control,
    behavior: BehaviorLogger,
    receipt: Option<SettlementReceipt>,
    view: watch::Sender<StorefrontView>,
}

impl Storefront {
    pub fn new(session: &Session, behavior: BehaviorLogger) -> Result<Self, ClientError> {
        let user_id = session.user()?.user_id;
        let (view, _) = watch::channel(StorefrontView::default());
        Ok(Self {
            api: session.api(),
            user_id,
            cart: Cart::new(),
            menu: Vec::new(),
            submit: Control::new(),
            behavior,
            receipt: None,
            view,
        })
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<StorefrontView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> StorefrontView {
        self.view.borrow().clone()
    }

    #[cfg(test)]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn menu(&self) -> &[DishView] {
        &self.menu
    }

    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, ClientError> {
        self.api.list_restaurants().await
    }

    /// Selects `restaurant_id` and loads its menu priced for this user.
    /// A declined switch leaves cart, menu and selection untouched.
    pub async fn open_restaurant(&mut self, restaurant_id: RestaurantId, confirm: &impl Confirm) -> Result<SwitchOutcome, ClientError> {
        let outcome = self.cart.switch_restaurant(restaurant_id, |lines| {
            confirm.confirm(&format!(
                "Ordering from a new restaurant will clear the {} item(s) in your cart. Continue?",
                lines
            ))
        });
        match outcome {
            SwitchOutcome::Declined => return Ok(outcome),
            SwitchOutcome::Cleared => {
                info!("cart cleared for switch to restaurant {}", restaurant_id);
                self.receipt = None;
            }
            SwitchOutcome::Switched => self.receipt = None,
            SwitchOutcome::Unchanged => {}
        }
        self.menu.clear();
        self.publish();

        self.record(restaurant_id, ActionType::ViewRestaurant);
        self.fetch_menu(restaurant_id).await?;
        Ok(outcome)
    }

    /// Re-reads the open menu, e.g. after tiers were reassigned. Cart lines keep their prices.
    pub async fn reload_menu(&mut self) -> Result<(), ClientError> {
        match self.cart.restaurant_id() {
            Some(restaurant_id) => self.fetch_menu(restaurant_id).await,
            None => Ok(()),
        }
    }

    async fn fetch_menu(&mut self, restaurant_id: RestaurantId) -> Result<(), ClientError> {
        let quotes = self.api.list_dishes(restaurant_id, self.user_id).await?;
        self.menu = quotes
            .into_iter()
            .map(|quote| pricing::project(restaurant_id, quote))
            .collect();
        Ok(())
    }

    pub fn add_dish(&mut self, dish_id: DishId) -> Result<(), ClientError> {
        self.add_dishes(&[dish_id])
    }

    /// Adds every dish or none: all ids are looked up on the menu before the cart changes.
    pub fn add_dishes(&mut self, dish_ids: &[DishId]) -> Result<(), ClientError> {
        let dishes = dish_ids
            .iter()
            .map(|dish_id| {
                self.menu
                    .iter()
                    .find(|dish| dish.id == *dish_id)
                    .cloned()
                    .ok_or_else(|| ClientError::validation(format!("dish {} is not on the current menu", dish_id)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for dish in &dishes {
            self.cart.add_item(dish)?;
            self.record(dish.restaurant_id, ActionType::AddToCart);
        }
        self.receipt = None;
        self.publish();
        Ok(())
    }

    /// Submits the cart. Success empties the cart and shows the server's figures;
    /// failure keeps the cart for another manual attempt.
    pub async fn place_order(&mut self) -> Result<SettlementReceipt, ClientError> {
        let intent = settlement::freeze(self.user_id, &self.cart)?;
        let submit = self.submit.clone();
        let guard = submit
            .try_disable()
            .ok_or(ClientError::InFlight("order submission"))?;
        self.publish();

        let outcome = settlement::settle(&self.api, &intent).await;
        drop(guard);

        if let Ok(receipt) = &outcome {
            self.cart.clear();
            self.receipt = Some(receipt.clone());
        }
        self.publish();
        outcome
    }

    fn record(&self, restaurant_id: RestaurantId, action_type: ActionType) {
        self.behavior.record(BehaviorEvent {
            user_id: self.user_id,
            restaurant_id,
            action_type,
        });
    }

    fn publish(&self) {
        self.view.send_replace(StorefrontView {
            cart: self.cart.snapshot(!self.submit.is_enabled()),
            receipt: self.receipt.clone(),
        });
    }
}
