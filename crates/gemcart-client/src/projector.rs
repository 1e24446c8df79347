//! Optimistic cart projection.
//!
//! The projection is a pure function of the last authoritative snapshot and
//! the outstanding mutations. It is recomputed on demand and never stored.

use gemcart_core::{CartCost, CartLine, CartMutation, CartSnapshot, Merchandise};

use crate::pending::PendingMutation;

/// Best-guess cart view for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedCart {
    /// `None` until the platform has created a cart.
    pub id: Option<String>,
    pub lines: Vec<CartLine>,
    pub total_quantity: u32,
    /// Totals from the last snapshot. Stale while `cost_pending` is set.
    pub cost: Option<CartCost>,
    pub checkout_url: Option<String>,
    /// Some outstanding mutation changed the lines.
    pub is_optimistic: bool,
    /// Some line's cost is not known yet.
    pub cost_pending: bool,
}

impl From<&CartSnapshot> for ProjectedCart {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            id: Some(snapshot.id.clone()),
            lines: snapshot.lines.clone(),
            total_quantity: snapshot.total_quantity,
            cost: Some(snapshot.cost.clone()),
            checkout_url: Some(snapshot.checkout_url.clone()),
            is_optimistic: false,
            cost_pending: false,
        }
    }
}

impl ProjectedCart {
    #[must_use]
    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    #[must_use]
    pub fn line_for_merchandise(&self, merchandise_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.merchandise.id == merchandise_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Projects `pending` onto `snapshot`.
///
/// Outstanding line mutations are applied in submission order, so the most
/// recent one touching a line decides its quantity. Adds for merchandise
/// already in the cart increase that line; other adds append a provisional
/// line with no cost. Updates to quantity zero remove the line. With nothing
/// outstanding the result is the snapshot unchanged.
#[must_use]
pub fn project(snapshot: Option<&CartSnapshot>, pending: &[PendingMutation]) -> ProjectedCart {
    let mut projected = snapshot.map(ProjectedCart::from).unwrap_or_default();

    let mut ordered: Vec<&PendingMutation> = pending
        .iter()
        .filter(|m| m.state.is_outstanding() && m.mutation.kind().changes_lines())
        .collect();
    if ordered.is_empty() {
        return projected;
    }
    ordered.sort_by_key(|m| m.id);

    for pending in ordered {
        apply(&mut projected.lines, pending);
    }

    projected.total_quantity = projected.lines.iter().map(|l| l.quantity).sum();
    projected.cost_pending = projected.lines.iter().any(|l| l.cost.is_none());
    projected.is_optimistic = true;
    projected
}

fn apply(lines: &mut Vec<CartLine>, pending: &PendingMutation) {
    match &pending.mutation {
        CartMutation::LinesAdd { lines: inputs } => {
            for (index, input) in inputs.iter().enumerate() {
                if let Some(line) = lines
                    .iter_mut()
                    .find(|l| l.merchandise.id == input.merchandise_id)
                {
                    line.quantity = line.quantity.saturating_add(input.quantity);
                    mark_optimistic(line);
                    continue;
                }
                lines.push(CartLine {
                    id: format!("optimistic-{}-{index}", pending.id),
                    merchandise: input
                        .selected_variant
                        .clone()
                        .unwrap_or_else(|| Merchandise::from_id(&input.merchandise_id)),
                    quantity: input.quantity,
                    cost: None,
                    is_optimistic: true,
                });
            }
        }
        CartMutation::LinesUpdate { lines: updates } => {
            for update in updates {
                if update.quantity == 0 {
                    lines.retain(|l| l.id != update.id);
                } else if let Some(line) = lines.iter_mut().find(|l| l.id == update.id) {
                    line.quantity = update.quantity;
                    mark_optimistic(line);
                }
            }
        }
        CartMutation::LinesRemove { line_ids } => {
            lines.retain(|l| !line_ids.contains(&l.id));
        }
        _ => {}
    }
}

fn mark_optimistic(line: &mut CartLine) {
    line.is_optimistic = true;
    line.cost = None;
}

#[cfg(test)]
#[path = "projector_test.rs"]
mod tests;
