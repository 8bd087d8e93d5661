//! Terminal rendering of the shop.
//!
//! Each store row is labelled `s<id>` and each cart row `c<id>`. Typing a
//! label activates that row the way a click would in a graphical front end.

use std::io::{self, Write};

use toyshop_core::{ApplicationError, Entry, EntryId, HandleMap, Shop, Transfer};
use tracing::debug;

pub struct TerminalAdapter {
    shop: Shop,
    store_handles: HandleMap<String>,
    cart_handles: HandleMap<String>,
    transfers: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Activation {
    Applied,
    Rejected(String),
    UnknownHandle,
}

impl TerminalAdapter {
    pub fn new(shop: Shop) -> Self {
        let mut store_handles = HandleMap::new();
        for entry in shop.store().iter() {
            store_handles.register(entry.id(), store_handle(entry.id()));
        }

        let mut cart_handles = HandleMap::new();
        for entry in shop.cart().iter() {
            cart_handles.register(entry.id(), cart_handle(entry.id()));
        }

        Self { shop, store_handles, cart_handles, transfers: 0 }
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Resolves a typed label and applies the matching transfer, writing the
    /// refreshed rows to `out`.
    pub fn activate(&mut self, handle: &str, out: &mut impl Write) -> io::Result<Activation> {
        let handle = handle.trim().to_ascii_lowercase();

        if let Some(id) = self.shop.store().find_by_handle(&self.store_handles, &handle).map(Entry::id)
        {
            return self.on_store_entry_activated(id, out);
        }
        if let Some(id) = self.shop.cart().find_by_handle(&self.cart_handles, &handle).map(Entry::id) {
            return self.on_cart_entry_activated(id, out);
        }

        Ok(Activation::UnknownHandle)
    }

    fn on_store_entry_activated(
        &mut self,
        id: EntryId,
        out: &mut impl Write,
    ) -> io::Result<Activation> {
        match self.shop.move_to_cart(id) {
            Ok(Transfer::Moved(receipt)) => {
                if receipt.cart_entry_created {
                    self.cart_handles.register(id, cart_handle(id));
                }
                self.transfers += 1;
                self.refresh_rows(id, out)?;
                Ok(Activation::Applied)
            }
            Ok(Transfer::OutOfStock { .. }) => {
                let name = self.shop.store().find_by_id(id).map(Entry::name).unwrap_or("That item");
                Ok(Activation::Rejected(format!("{name} is out of stock.")))
            }
            Err(error) => Ok(Activation::Rejected(rejection(error.into()))),
        }
    }

    fn on_cart_entry_activated(
        &mut self,
        id: EntryId,
        out: &mut impl Write,
    ) -> io::Result<Activation> {
        let receipt = match self.shop.move_to_store(id) {
            Ok(receipt) => receipt,
            Err(error) => return Ok(Activation::Rejected(rejection(error.into()))),
        };

        if receipt.cart_entry_removed {
            if let Some(released) = self.cart_handles.release(id) {
                debug!(event_name = "adapter.handle.released", handle = %released);
            }
        }
        self.transfers += 1;
        self.refresh_rows(id, out)?;
        Ok(Activation::Applied)
    }

    fn refresh_rows(&self, id: EntryId, out: &mut impl Write) -> io::Result<()> {
        if let Some(entry) = self.shop.store().find_by_id(id) {
            writeln!(out, "  {}", row(&self.store_handles, entry))?;
        }
        match self.shop.cart().find_by_id(id) {
            Some(entry) => writeln!(out, "  {}", row(&self.cart_handles, entry))?,
            None => writeln!(out, "  [{}] removed from cart", cart_handle(id))?,
        }
        writeln!(out, "{}", self.shop.total_display())
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Store")?;
        if self.shop.store().is_empty() {
            writeln!(out, "  (empty)")?;
        }
        for entry in self.shop.store().iter() {
            writeln!(out, "  {}", row(&self.store_handles, entry))?;
        }

        writeln!(out, "Cart")?;
        if self.shop.cart().is_empty() {
            writeln!(out, "  (empty)")?;
        }
        for entry in self.shop.cart().iter() {
            writeln!(out, "  {}", row(&self.cart_handles, entry))?;
        }

        writeln!(out, "{}", self.shop.total_display())
    }
}

fn store_handle(id: EntryId) -> String {
    format!("s{id}")
}

fn cart_handle(id: EntryId) -> String {
    format!("c{id}")
}

fn row(handles: &HandleMap<String>, entry: &Entry) -> String {
    let label = handles.handle_of(entry.id()).map(String::as_str).unwrap_or("?");
    format!("[{label}] {}", entry.describe())
}

fn rejection(error: ApplicationError) -> String {
    debug!(event_name = "adapter.activation.rejected", error = %error);
    error.user_message().to_string()
}
