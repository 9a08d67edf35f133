//! Quote cart state container.
//!
//! The cart is a client-owned ledger of line items (custom print jobs and
//! blank catalog garments) with derived totals, consumed by checkout. It
//! does no I/O of its own: the line items serialize through serde and ride
//! in the session store, which is what makes them survive restarts. The
//! drawer visibility flag is presentation state and deliberately does not
//! persist.
//!
//! # Derived-field invariants
//!
//! For any item carrying a size run, `quantity` is always the sum of the
//! run's counts, and `total_price` is always `unit_price * quantity`.
//! Both are recomputed inside every mutator and are not independently
//! settable: the fields are private and only readable through accessors.
//! Quantity updates on sized items scale the size buckets proportionally
//! (largest-remainder rounding) so the run stays authoritative.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::{PriceTier, ShareId, tier_unit_price};

/// Size label to ordered-count mapping (e.g., `{"S": 2, "M": 3}`).
pub type SizeRun = BTreeMap<String, u32>;

/// What a line item refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItemKind {
    /// A free-form studio design plus the print service applied to it.
    Custom {
        /// Share id of the saved design, when it was saved.
        design_share_id: Option<ShareId>,
        /// Print service type (e.g., "screen-print", "dtg", "embroidery").
        service: String,
    },
    /// A supplier-sourced blank garment from the catalog.
    Blank {
        product_id: String,
        variant_id: Option<String>,
        supplier: String,
        /// Quantity price breaks from the supplier catalog. When present,
        /// the unit price is re-derived from this table on every quantity
        /// change.
        #[serde(default)]
        price_tiers: Vec<PriceTier>,
    },
}

/// Input for adding a custom print item.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomItemInput {
    pub name: String,
    pub design_share_id: Option<ShareId>,
    pub service: String,
    #[serde(default)]
    pub sizes: SizeRun,
    pub unit_price: Decimal,
}

/// Input for adding a blank garment item.
#[derive(Debug, Clone, Deserialize)]
pub struct BlankItemInput {
    pub name: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub supplier: String,
    pub sizes: SizeRun,
    pub unit_price: Decimal,
    #[serde(default)]
    pub price_tiers: Vec<PriceTier>,
}

/// One quote line: an item, its size run, and derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    id: Uuid,
    name: String,
    #[serde(flatten)]
    kind: LineItemKind,
    sizes: SizeRun,
    quantity: u32,
    unit_price: Decimal,
    total_price: Decimal,
}

impl LineItem {
    fn new(name: String, kind: LineItemKind, sizes: SizeRun, unit_price: Decimal) -> Self {
        let mut item = Self {
            id: Uuid::new_v4(),
            name,
            kind,
            sizes,
            quantity: 0,
            unit_price,
            total_price: Decimal::ZERO,
        };
        item.recompute();
        item
    }

    /// Local identifier, unique within the cart.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &LineItemKind {
        &self.kind
    }

    #[must_use]
    pub const fn sizes(&self) -> &SizeRun {
        &self.sizes
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Recompute the derived fields from the authoritative ones.
    ///
    /// Items without a size run keep their bare quantity; anything with a
    /// run derives quantity from it. Blank items carrying a tier table
    /// re-derive their unit price from the new quantity (a quantity below
    /// every tier keeps the last price).
    fn recompute(&mut self) {
        if !self.sizes.is_empty() {
            self.quantity = self.sizes.values().sum();
        }
        if let LineItemKind::Blank { price_tiers, .. } = &self.kind
            && let Some(price) = tier_unit_price(price_tiers, self.quantity)
        {
            self.unit_price = price;
        }
        self.total_price = self.unit_price * Decimal::from(self.quantity);
    }

    fn set_sizes(&mut self, sizes: SizeRun) {
        self.sizes = sizes;
        self.recompute();
    }

    fn set_sizes_and_price(&mut self, sizes: SizeRun, unit_price: Decimal) {
        self.sizes = sizes;
        self.unit_price = unit_price;
        self.recompute();
    }

    /// Set the quantity, scaling any size run proportionally.
    ///
    /// Largest-remainder rounding: each bucket gets the floor of its
    /// proportional share, then leftover units go to the buckets with the
    /// largest remainders (label order breaks ties). The run's counts
    /// always sum to the new quantity afterwards.
    fn set_quantity(&mut self, quantity: u32) {
        if self.sizes.is_empty() || self.quantity == 0 {
            // No breakdown to preserve. A sized item at zero quantity has
            // lost its proportions; dump the new quantity into the first
            // bucket rather than inventing a split.
            if let Some(first) = self.sizes.values_mut().next() {
                *first = quantity;
            }
            self.quantity = quantity;
            self.recompute();
            return;
        }

        let old_total = u64::from(self.quantity);
        let new_total = u64::from(quantity);

        let mut assigned: u64 = 0;
        let mut shares: Vec<(String, u64, u64)> = Vec::with_capacity(self.sizes.len());
        for (label, count) in &self.sizes {
            let scaled = u64::from(*count) * new_total;
            let floor = scaled / old_total;
            let remainder = scaled % old_total;
            assigned += floor;
            shares.push((label.clone(), floor, remainder));
        }

        // Hand out the units lost to flooring, biggest remainder first.
        let mut leftover = new_total - assigned;
        shares.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        for share in &mut shares {
            if leftover == 0 {
                break;
            }
            share.1 += 1;
            leftover -= 1;
        }

        for (label, count, _) in shares {
            self.sizes.insert(label, u32::try_from(count).unwrap_or(u32::MAX));
        }
        self.recompute();
    }
}

/// The quote cart: line items plus drawer visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteCart {
    items: Vec<LineItem>,
    /// Drawer visibility. Presentation state; never persisted.
    #[serde(skip)]
    open: bool,
}

impl QuoteCart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a custom print item. Returns the new item's local id.
    pub fn add_custom_item(&mut self, input: CustomItemInput) -> Uuid {
        let item = LineItem::new(
            input.name,
            LineItemKind::Custom {
                design_share_id: input.design_share_id,
                service: input.service,
            },
            input.sizes,
            input.unit_price,
        );
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Append a blank garment item, deriving quantity and total from the
    /// size run at insertion. Returns the new item's local id.
    pub fn add_blank_item(&mut self, input: BlankItemInput) -> Uuid {
        let item = LineItem::new(
            input.name,
            LineItemKind::Blank {
                product_id: input.product_id,
                variant_id: input.variant_id,
                supplier: input.supplier,
                price_tiers: input.price_tiers,
            },
            input.sizes,
            input.unit_price,
        );
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Remove an item by local id. No-op (returns `false`) if absent.
    pub fn remove_item(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() < before
    }

    /// Set an item's quantity, scaling its size run proportionally.
    ///
    /// Returns `false` if no item carries the id.
    pub fn update_quantity(&mut self, id: Uuid, quantity: u32) -> bool {
        self.with_item(id, |item| item.set_quantity(quantity))
    }

    /// Replace an item's size run, rederiving quantity and total.
    ///
    /// Returns `false` if no item carries the id.
    pub fn update_sizes(&mut self, id: Uuid, sizes: SizeRun) -> bool {
        self.with_item(id, |item| item.set_sizes(sizes))
    }

    /// Replace a blank item's size run and its (re-tiered) unit price.
    ///
    /// For items without an attached tier table: the caller looked up the
    /// price break itself, so run and price arrive together and the totals
    /// are recomputed once. An attached tier table takes precedence over
    /// the supplied price.
    pub fn update_blank_item_sizes(
        &mut self,
        id: Uuid,
        sizes: SizeRun,
        unit_price: Decimal,
    ) -> bool {
        self.with_item(id, |item| item.set_sizes_and_price(sizes, unit_price))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up an item by local id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Total units across all items (sum of quantities).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::total_price).sum()
    }

    /// Number of line entries.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart drawer is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Open the cart drawer.
    pub const fn open(&mut self) {
        self.open = true;
    }

    /// Close the cart drawer.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Toggle the cart drawer.
    pub const fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn with_item(&mut self, id: Uuid, f: impl FnOnce(&mut LineItem)) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }
}
