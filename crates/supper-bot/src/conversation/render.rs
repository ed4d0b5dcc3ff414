//! Customer-facing texts and keyboards.

use super::context::Destination;
use crate::branding::Branding;
use super::event::Callback;
use crate::model::{
    format_timestamp, Cart, DeliverySession, MenuGroup, PickupSlot, PickupStore, PRICED_GROUP,
};
use crate::transport::{Button, Markup, Outbound};

pub const ORDER_BUTTON_TEXT: &str = "🍧 Order Now";
pub const HELP_BUTTON_TEXT: &str = "❓ Help";
pub const START_OVER_BUTTON_TEXT: &str = "🔄 Start Over";
pub const SHOW_MENU_BUTTON_TEXT: &str = "📋 Show Menu";
pub const SHOW_DELIVERIES_BUTTON_TEXT: &str = "🚚 Show Deliveries";
pub const RESTART_ORDER_BUTTON_TEXT: &str = "🔄 Restart Order";
pub const CANCEL_ORDER_BUTTON_TEXT: &str = "❌ Cancel Order";

pub const MAX_QUANTITY: u32 = 5;

pub const GENERIC_ERROR: &str =
    "⚠️ An error occurred while processing your request. Please try again or contact the admin.";

/// Keyboard shown outside the ordering flow.
pub fn main_keyboard() -> Markup {
    Markup::Reply(vec![
        vec![ORDER_BUTTON_TEXT.to_string(), SHOW_MENU_BUTTON_TEXT.to_string()],
        vec![SHOW_DELIVERIES_BUTTON_TEXT.to_string(), HELP_BUTTON_TEXT.to_string()],
        vec![START_OVER_BUTTON_TEXT.to_string()],
    ])
}

/// Keyboard shown while an order is in progress.
pub fn order_keyboard() -> Markup {
    Markup::Reply(vec![vec![
        RESTART_ORDER_BUTTON_TEXT.to_string(),
        CANCEL_ORDER_BUTTON_TEXT.to_string(),
    ]])
}

fn button(text: impl Into<String>, callback: Callback) -> Vec<Button> {
    vec![Button::new(text, callback.data())]
}

/// One button per row, plus the cancel row every choice menu ends with.
fn choice_menu(rows: impl IntoIterator<Item = Vec<Button>>) -> Markup {
    let mut rows: Vec<Vec<Button>> = rows.into_iter().collect();
    rows.push(button("❌ Cancel", Callback::Cancel));
    Markup::Inline(rows)
}

fn final_text(text: impl Into<String>) -> Outbound {
    Outbound::text_with(text, main_keyboard())
}

/// Banner image first when one is configured, then the greeting with the main
/// keyboard, so the greeting still arrives if the image cannot be sent.
pub fn welcome(branding: &Branding) -> Vec<Outbound> {
    let mut out = Vec::new();
    if let Some(banner) = branding.banner() {
        out.push(Outbound::Image {
            source: banner.to_string(),
            caption: branding.title.clone(),
        });
    }
    out.push(final_text(format!(
        "**{}**\n\n\
         {}\n\n\
         **What you can do:**\n\
         • Tap **Order Now** to start a new delivery order\n\
         • Type /pickup to collect your order from a store\n\
         • Use **Show Menu** to preview flavors, sauces, and prices\n\
         • Check **Show Deliveries** for upcoming sessions\n\
         • Tap **❓ Help** anytime for guidance\n\n\
         Ready for your treat? Tap **🍧 Order Now** or type `/order`! 🎉",
        branding.title, branding.subtitle
    )));
    out
}

pub fn help() -> Outbound {
    final_text(
        "📖 **How to Order**\n\n\
         1️⃣ Tap **Order Now** or type `/order`\n\
         2️⃣ Choose a **delivery session** that fits your schedule\n\
         3️⃣ Select flavor, sauce, and quantity\n\
         4️⃣ Confirm and pay via the QR code\n\
         5️⃣ Upload your payment screenshot\n\n\
         We'll process your order right after payment is submitted. 🍧\n\n\
         **Need a refresher?**\n\
         - Use **Show Menu** to see flavors, sauces, and prices\n\
         - Tap **Show Deliveries** for upcoming sessions and cutoffs\n\n\
         If anything goes wrong, tap **🔄 Restart Order** or **❌ Cancel Order**, or contact the admin team.",
    )
}

pub fn menu_listing(groups: &[MenuGroup]) -> Outbound {
    let mut lines = vec!["📋 **Our Menu**".to_string(), String::new()];
    for (index, group) in groups.iter().enumerate() {
        if index == PRICED_GROUP {
            lines.push(format!("🍧 **{}** (choose one)", group.title));
        } else {
            lines.push(format!("✨ **{}**", group.title));
        }
        for option in &group.options {
            if index == PRICED_GROUP && option.price() > 0.0 {
                lines.push(format!("• {} — ${:.2}", option.name(), option.price()));
            } else {
                lines.push(format!("• {}", option.name()));
            }
        }
        lines.push(String::new());
    }
    final_text(lines.join("\n").trim_end())
}

pub fn delivery_schedule(sessions: &[DeliverySession]) -> Outbound {
    if sessions.is_empty() {
        return final_text(
            "🚚 There are no active delivery sessions at the moment. Please check back later!",
        );
    }
    let entries: Vec<String> = sessions
        .iter()
        .map(|session| {
            format!(
                "• **{}**\n  🕒 Delivery: {}\n  ⏰ Cutoff: {}",
                session.location,
                session.time_label(),
                format_timestamp(&session.cutoff_time)
            )
        })
        .collect();
    final_text(format!("🚚 **Upcoming Deliveries**\n\n{}", entries.join("\n\n")))
}

pub fn no_deliveries() -> Outbound {
    final_text(
        "⚠️ Sorry, there are no active delivery sessions at the moment.\n\
         Please check back later or contact the admin team.",
    )
}

pub fn delivery_prompt(sessions: &[DeliverySession]) -> Outbound {
    Outbound::prompt(
        "🚚 **Select Delivery Session:**\n\nChoose when you'd like your order delivered:",
        choice_menu(
            sessions
                .iter()
                .map(|session| button(session.button_label(), Callback::Delivery(session.id.clone()))),
        ),
    )
}

pub fn order_controls_hint() -> Outbound {
    Outbound::text_with(
        "Need to restart or cancel? Use the buttons below anytime.",
        order_keyboard(),
    )
}

pub fn delivery_not_found() -> Outbound {
    Outbound::replace("⚠️ Delivery not found. Please try again.")
}

pub fn no_stores() -> Outbound {
    final_text(
        "⚠️ Sorry, there are no pickup stores available at the moment.\n\
         Please check back later or contact the admin team.",
    )
}

pub fn store_prompt(stores: &[PickupStore]) -> Outbound {
    Outbound::prompt(
        "🏪 **Select Pickup Store:**\n\nChoose where you'd like to collect your order:",
        choice_menu(
            stores
                .iter()
                .map(|store| button(format!("🏪 {}", store.name), Callback::Store(store.id.clone()))),
        ),
    )
}

pub fn store_not_found() -> Outbound {
    Outbound::replace("⚠️ Store not found. Please try again.")
}

pub fn no_slots(store: &PickupStore) -> Outbound {
    Outbound::replace(format!(
        "⚠️ Sorry, {} has no upcoming pickup slots.\nPlease choose another store or check back later.",
        store.name
    ))
}

pub fn slot_prompt(store: &PickupStore, slots: &[PickupSlot]) -> Outbound {
    let mut text = format!("📅 **Select Pickup Time:**\n\n🏪 {}", store.name);
    if !store.address.trim().is_empty() {
        text.push_str(&format!("\n📍 {}", store.address));
    }
    Outbound::prompt(
        text,
        choice_menu(
            slots
                .iter()
                .enumerate()
                .map(|(index, slot)| button(slot.label(), Callback::Slot(index))),
        ),
    )
}

pub fn name_prompt() -> Outbound {
    Outbound::replace("👤 **User Registration**\n\nPlease enter your full name:")
}

pub fn invalid_name() -> Outbound {
    Outbound::text("⚠️ Please enter a valid name (at least 2 characters).")
}

pub fn phone_prompt() -> Outbound {
    Outbound::text("📱 **Phone Number**\n\nPlease enter your phone number (for delivery contact):")
}

pub fn invalid_phone() -> Outbound {
    Outbound::text("⚠️ Please enter a valid phone number.")
}

pub fn registration_complete() -> Outbound {
    Outbound::text("✅ Registration complete!")
}

pub fn group_prompt(groups: &[MenuGroup], index: usize) -> Outbound {
    let group = &groups[index];
    Outbound::prompt(
        group.prompt(),
        choice_menu(group.options.iter().enumerate().map(|(option, choice)| {
            button(
                choice.button_text(),
                Callback::Menu {
                    group: index,
                    option,
                },
            )
        })),
    )
}

pub fn quantity_prompt() -> Outbound {
    Outbound::prompt(
        "📦 **Select Quantity:**",
        choice_menu((1..=MAX_QUANTITY).map(|n| button(format!("{n} bowl(s)"), Callback::Quantity(n)))),
    )
}

fn cart_lines(cart: &Cart) -> String {
    cart.items()
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{}. {} = ${:.2}\n", index + 1, item.describe(), item.item_total))
        .collect()
}

pub fn cart_prompt(cart: &Cart) -> Outbound {
    Outbound::prompt(
        format!(
            "🛒 **Your Cart:**\n\n{}\n**Total: ${:.2}**",
            cart_lines(cart),
            cart.total_price()
        ),
        choice_menu([
            button("➕ Add More Items", Callback::AddMore),
            button("✅ Proceed to Payment", Callback::ProceedPayment),
        ]),
    )
}

fn destination_lines(destination: Option<&Destination>) -> String {
    match destination {
        Some(Destination::Delivery(session)) => format!(
            "📍 **Delivery:** {}\n🕐 **Time:** {}\n",
            session.location,
            session.time_label()
        ),
        Some(Destination::Pickup { store, slot }) => format!(
            "🏪 **Pickup:** {}\n📅 **Date:** {}\n🕐 **Time:** {}\n",
            store.name,
            slot.date_label(),
            slot.time
        ),
        None => "📍 **Delivery:** Unknown\n🕐 **Time:** N/A\n".to_string(),
    }
}

pub fn order_summary(destination: Option<&Destination>, cart: &Cart) -> Outbound {
    Outbound::prompt(
        format!(
            "✅ **Order Summary:**\n\n{}\n**Items:**\n{}\n**Total Items:** {}\n**Total Price:** ${:.2}\n\n\
             **Please confirm to proceed to payment:**",
            destination_lines(destination),
            cart_lines(cart),
            cart.total_quantity(),
            cart.total_price()
        ),
        choice_menu([button("✅ Confirm Order", Callback::Confirm)]),
    )
}

fn order_confirmed_text(order_id: &str) -> String {
    format!("✅ **Order Confirmed!**\n\nOrder ID: `{order_id}`")
}

pub fn order_confirmed(order_id: &str) -> Outbound {
    Outbound::replace(format!("{}\n\nProceeding to payment...", order_confirmed_text(order_id)))
}

pub fn payment_method_prompt(order_id: &str) -> Outbound {
    Outbound::prompt(
        format!(
            "{}\n\n💳 **Choose Payment Method:**",
            order_confirmed_text(order_id)
        ),
        choice_menu([
            button("💳 Pay Now", Callback::PayNow),
            button("💵 Pay at Counter", Callback::PayAtCounter),
        ]),
    )
}

pub fn pay_now_chosen() -> Outbound {
    Outbound::replace("💳 **Payment Method:** Pay Now\n\nProceeding to payment...")
}

pub fn pay_at_counter_chosen() -> Outbound {
    Outbound::replace("💵 **Payment Method:** Pay at Counter\n\nProcessing your order...")
}

pub fn payment_request(total_quantity: u32, total_price: f64) -> String {
    format!(
        "💳 **Payment Required**\n\n\
         Total Items: {total_quantity}\n\
         Total Amount: **${total_price:.2}**\n\n\
         Please:\n\
         1️⃣ Scan the QR code below to make payment\n\
         2️⃣ Take a screenshot of your payment confirmation\n\
         3️⃣ Upload the screenshot here\n\n\
         ⚠️ Your order will be confirmed once payment is received."
    )
}

pub const QR_MISSING_NOTE: &str =
    "⚠️ QR code image not configured. Please contact admin for payment details.";

pub fn upload_prompt() -> Outbound {
    Outbound::text("📸 Please upload your payment screenshot now, or use /cancel to abort.")
}

pub fn photo_required() -> Outbound {
    Outbound::text(
        "⚠️ Please upload your payment screenshot as a photo so we can verify it.\n\
         You can also use /cancel to abort this order.",
    )
}

pub fn screenshot_received() -> [Outbound; 2] {
    [
        Outbound::text("✅ Payment screenshot received!"),
        Outbound::text("⏳ Processing your order..."),
    ]
}

pub fn delivery_order_complete(order_id: &str) -> Outbound {
    final_text(format!(
        "🎉 **Order Complete!**\n\n\
         Your order has been logged successfully.\n\
         Order ID: `{order_id}`\n\n\
         We'll verify your payment and confirm your order soon.\n\
         Thank you for ordering! 🍧\n\n\
         Use the buttons below to place another order or get help!"
    ))
}

pub fn pickup_order_complete(order_id: &str, store: &PickupStore, slot: &PickupSlot, at_counter: bool) -> Outbound {
    let (title, closing) = if at_counter {
        (
            "🎉 **Pickup Order Confirmed!**",
            "💵 **Payment:** At Counter\n\nPlease pay when you pick up your order.\nThank you! 🍧",
        )
    } else {
        (
            "🎉 **Pickup Order Complete!**",
            "We'll verify your payment and prepare your order.\nThank you! 🍧",
        )
    };
    final_text(format!(
        "{title}\n\n\
         Order ID: `{order_id}`\n\n\
         **Pickup Details:**\n\
         🏪 Store: {}\n\
         📅 Date: {}\n\
         🕐 Time: {}\n\n\
         {closing}",
        store.name,
        slot.date_label(),
        slot.time
    ))
}

/// The store declined the record.
pub fn order_not_logged(order_id: &str, has_receipt: bool) -> Outbound {
    let saved = if has_receipt {
        " Your payment screenshot has been saved."
    } else {
        ""
    };
    final_text(format!(
        "⚠️ There was an issue logging your order to the system.{saved} \
         Please contact the admin with your order ID: `{order_id}`"
    ))
}

/// The store could not be reached.
pub fn order_failed(order_id: &str) -> Outbound {
    final_text(format!(
        "⚠️ Error processing order. Please contact the admin with your order ID: `{order_id}`"
    ))
}

pub fn order_cancelled_by_button() -> Outbound {
    Outbound::replace("❌ Order cancelled. Use /order to start again.")
}

pub fn order_cancelled() -> Outbound {
    final_text("❌ Order cancelled. Tap **Order Now** whenever you're ready to try again!")
}

pub fn payment_cancelled() -> Outbound {
    final_text("❌ Payment cancelled. Your order was not submitted.\nUse the buttons below to start over!")
}

pub fn order_restarted() -> Outbound {
    final_text("🔄 Order restarted. Tap **Order Now** to begin again!")
}

pub fn stale_button(alert: &str) -> Outbound {
    Outbound::text(format!("⚠️ {alert}"))
}
