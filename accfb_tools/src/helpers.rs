use std::collections::HashSet;

use crate::data_objects::{Order, OrderId};

/// Drop every order whose status marks it as soft-deleted or cancelled. The backend
/// keeps serving those rows, so this runs on every fetch before anything else sees the
/// list. Idempotent.
pub fn filter_visible(orders: Vec<Order>) -> Vec<Order> {
    orders.into_iter().filter(Order::is_visible).collect()
}

/// Return the orders in `next` whose ids were not present in the previous snapshot,
/// preserving the backend's ordering (newest first as served by `/get`).
pub fn diff_new_orders(prev_ids: &HashSet<OrderId>, next: &[Order]) -> Vec<Order> {
    next.iter().filter(|o| !prev_ids.contains(&o.id)).cloned().collect()
}

/// Collect the id set of a snapshot for use as the `prev_ids` of the next diff.
pub fn id_set(orders: &[Order]) -> HashSet<OrderId> {
    orders.iter().map(|o| o.id).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn order(id: i64, status: &str) -> Order {
        let mut o = Order::new(id);
        o.status = Some(status.to_string());
        o
    }

    #[test]
    fn filter_drops_deleted_and_cancelled() {
        let orders = vec![order(1, "CONFIRMED"), order(2, "DELETED"), order(3, "CANCELLED"), order(4, "SHIPPED")];
        let visible = filter_visible(orders);
        assert_eq!(visible.iter().map(|o| o.id.value()).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn filter_is_idempotent() {
        let orders = vec![order(1, "CONFIRMED"), order(2, "DELETED"), order(3, "PENDING_PAYMENT")];
        let once = filter_visible(orders);
        let once_ids = once.iter().map(|o| o.id).collect::<Vec<_>>();
        let twice = filter_visible(once);
        assert_eq!(twice.iter().map(|o| o.id).collect::<Vec<_>>(), once_ids);
    }

    #[test]
    fn diff_returns_only_unseen_ids_in_backend_order() {
        let prev = id_set(&[order(1, "CONFIRMED"), order(2, "CONFIRMED")]);
        let next = vec![order(5, "PENDING_PAYMENT"), order(1, "CONFIRMED"), order(4, "PENDING_PAYMENT")];
        let newly = diff_new_orders(&prev, &next);
        assert_eq!(newly.iter().map(|o| o.id.value()).collect::<Vec<_>>(), vec![5, 4]);
    }

    #[test]
    fn diff_with_empty_snapshot_returns_everything() {
        let next = vec![order(1, "CONFIRMED"), order(2, "CONFIRMED")];
        let newly = diff_new_orders(&HashSet::new(), &next);
        assert_eq!(newly.len(), 2);
    }

    // The scenario from the admin page: baseline [1 visible, 2 deleted], next poll
    // serves [1, 3] -> only 3 is new.
    #[test]
    fn baseline_then_new_order_scenario() {
        let baseline = filter_visible(vec![order(1, "CONFIRMED"), order(2, "DELETED")]);
        assert_eq!(baseline.len(), 1);
        let prev = id_set(&baseline);
        let next = filter_visible(vec![order(1, "CONFIRMED"), order(3, "PENDING_PAYMENT")]);
        let newly = diff_new_orders(&prev, &next);
        assert_eq!(newly.len(), 1);
        assert_eq!(newly[0].id.value(), 3);
    }
}
