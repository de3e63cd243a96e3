//! Integration tests for the full cart action flow over the demo catalog.
//!
//! The main scenario walks a cart through every action type and checks the
//! derived totals at each step:
//!
//! 1. Add Premium Wireless Headphones (₹24,999.00)
//!    - 1 line, 1 item, total 2,499,900 minor units
//! 2. Add Handcrafted Ceramic Mug x2 (₹1,665.00 each)
//!    - 2 lines, 3 items, total 2,832,900
//! 3. Add the headphones again
//!    - still 2 lines (quantities merge), 4 items, total 5,332,800
//! 4. Update the mug quantity to 5
//!    - 2 lines, 7 items, total 5,832,300
//! 5. Update the headphones quantity to 0
//!    - the line is removed: 1 line, 5 items, total 832,500
//! 6. Remove an id that is not in the cart
//!    - no-op, state unchanged
//! 7. Clear the cart
//!    - empty, totals back to zero

use std::sync::{Arc, Mutex};

use testresult::TestResult;

use barrow::{
    cart::{CartAction, CartState},
    fixtures::Fixture,
    products::{Product, ProductId},
};

fn add(product: &Product, quantity: u32) -> CartAction {
    CartAction::AddToCart {
        product: product.clone(),
        quantity,
    }
}

#[test]
fn cart_flow_derives_totals_at_every_step() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let headphones = fixture.product(1)?;
    let mug = fixture.product(7)?;

    let mut store = fixture.store()?;

    // Step 1: one pair of headphones.
    let state = store.dispatch(&add(headphones, 1));

    assert_eq!(state.len(), 1);
    assert_eq!(state.item_count(), 1);
    assert_eq!(state.total().to_minor_units(), 2_499_900);

    // Step 2: two mugs.
    let state = store.dispatch(&add(mug, 2));

    assert_eq!(state.len(), 2);
    assert_eq!(state.item_count(), 3);
    assert_eq!(state.total().to_minor_units(), 2_832_900);

    // Step 3: same headphones again, quantities merge instead of a new line.
    let state = store.dispatch(&add(headphones, 1));

    assert_eq!(state.len(), 2);
    assert_eq!(state.item_count(), 4);
    assert_eq!(state.total().to_minor_units(), 5_332_800);

    // Step 4: absolute quantity update on the mug line.
    let state = store.dispatch(&CartAction::UpdateQuantity {
        id: mug.id,
        quantity: 5,
    });

    assert_eq!(state.len(), 2);
    assert_eq!(state.item_count(), 7);
    assert_eq!(state.total().to_minor_units(), 5_832_300);

    // Step 5: updating to zero removes the line.
    let state = store.dispatch(&CartAction::UpdateQuantity {
        id: headphones.id,
        quantity: 0,
    });

    assert_eq!(state.len(), 1);
    assert_eq!(state.item_count(), 5);
    assert_eq!(state.total().to_minor_units(), 832_500);

    // Step 6: removing an unknown id changes nothing.
    let before = store.state();
    let state = store.dispatch(&CartAction::RemoveFromCart(ProductId::new(99)));

    assert_eq!(*state, *before);

    // Step 7: clearing empties the cart.
    let state = store.dispatch(&CartAction::ClearCart);

    assert!(state.is_empty());
    assert_eq!(state.item_count(), 0);
    assert_eq!(state.total().to_minor_units(), 0);

    Ok(())
}

#[test]
fn merging_preserves_the_original_line_position() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let speaker = fixture.product(8)?;
    let coffee = fixture.product(4)?;

    let mut store = fixture.store()?;

    store.dispatch(&add(speaker, 1));
    store.dispatch(&add(coffee, 1));

    // The speaker line keeps its slot at the front when it merges.
    let state = store.dispatch(&add(speaker, 1));

    let ids: Vec<ProductId> = state.items().iter().map(|line| line.id()).collect();

    assert_eq!(ids, [speaker.id, coffee.id]);
    assert_eq!(state.items().first().map(barrow::cart::LineItem::quantity), Some(2));

    Ok(())
}

#[test]
fn snapshots_stay_frozen_while_the_store_moves_on() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let backpack = fixture.product(3)?;

    let mut store = fixture.store()?;

    let first = store.dispatch(&add(backpack, 1));

    store.dispatch(&add(backpack, 4));
    store.dispatch(&CartAction::ClearCart);

    // The early snapshot still reports the state at dispatch time.
    assert_eq!(first.item_count(), 1);
    assert_eq!(first.total().to_minor_units(), 749_900);
    assert!(store.state().is_empty());

    Ok(())
}

#[test]
fn subscribers_observe_every_dispatch_in_order() -> TestResult {
    let fixture = Fixture::from_set("demo")?;
    let watch = fixture.product(2)?;

    let mut store = fixture.store()?;

    let counts: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&counts);

    let key = store.subscribe(move |state: &CartState| {
        if let Ok(mut seen) = sink.lock() {
            seen.push(state.item_count());
        }
    });

    store.dispatch(&add(watch, 1));
    store.dispatch(&add(watch, 2));
    store.dispatch(&CartAction::ClearCart);

    store.unsubscribe(key);
    store.dispatch(&add(watch, 1));

    let seen = counts.lock().map(|seen| seen.clone()).unwrap_or_default();

    assert_eq!(seen, [1, 3, 0]);

    Ok(())
}
