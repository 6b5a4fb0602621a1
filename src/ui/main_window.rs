use crate::api::client::{ApiClient, SpamApi};
use crate::render::{self, Tone};
use crate::samples::Category;
use crate::utils::run_async_to_main;
use crate::view::ClientView;
use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use gtk4::gdk;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

const TONE_CLASSES: [&str; 3] = ["warning", "success", "error"];

struct Widgets {
    status: gtk::Label,
    buffer: gtk::TextBuffer,
    placeholder: gtk::Label,
    submit_btn: gtk::Button,
    submit_label: gtk::Label,
    spinner: gtk::Spinner,
    result_box: gtk::Box,
    result_headline: gtk::Label,
    result_description: gtk::Label,
    result_bar: gtk::ProgressBar,
    result_percent: gtk::Label,
    stats_box: gtk::Box,
    stats_accuracy: gtk::Label,
    stats_extra: gtk::Box,
}

struct Context {
    window: adw::ApplicationWindow,
    view: RefCell<ClientView<ApiClient, StdRng>>,
    widgets: Widgets,
    alert_open: Cell<bool>,
}

fn set_tone(widget: &impl IsA<gtk::Widget>, tone: Tone) {
    for class in TONE_CLASSES {
        widget.remove_css_class(class);
    }
    widget.add_css_class(tone.css_class());
}

fn is_submit_shortcut(key: gdk::Key, modifiers: gdk::ModifierType) -> bool {
    let enter = key == gdk::Key::Return || key == gdk::Key::KP_Enter;
    enter && modifiers.contains(gdk::ModifierType::CONTROL_MASK)
}

fn muted_label(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("dim-label");
    label.set_halign(gtk::Align::Start);
    label.set_wrap(true);
    label
}

/// Push the current state into the widgets and raise a pending alert.
fn refresh(ctx: &Rc<Context>) {
    let state = ctx.view.borrow().state().clone();
    let w = &ctx.widgets;

    let badge = render::status_badge(state.api_status);
    w.status.set_label(badge.text);
    set_tone(&w.status, badge.tone);

    w.placeholder.set_visible(render::placeholder_visible(&state));

    let button = render::submit_button(&state);
    w.submit_btn.set_sensitive(button.sensitive);
    w.submit_label.set_label(button.label);
    w.spinner.set_visible(button.spinning);
    w.spinner.set_spinning(button.spinning);

    match render::result_card(&state) {
        Some(card) => {
            w.result_headline.set_label(card.headline);
            w.result_description.set_label(card.description);
            w.result_bar.set_fraction(card.fraction);
            w.result_percent.set_label(&card.percent);
            set_tone(&w.result_box, card.tone);
            set_tone(&w.result_headline, card.tone);
            w.result_box.set_visible(true);
        }
        None => w.result_box.set_visible(false),
    }

    match render::stats_card(&state) {
        Some(card) => {
            w.stats_accuracy.set_label(&card.accuracy);
            while let Some(child) = w.stats_extra.first_child() {
                w.stats_extra.remove(&child);
            }
            for (key, value) in card.extra {
                w.stats_extra.append(&muted_label(&format!("{key} : {value}")));
            }
            w.stats_box.set_visible(true);
        }
        None => w.stats_box.set_visible(false),
    }

    if let Some(alert) = state.alert {
        if !ctx.alert_open.replace(true) {
            let dialog = adw::MessageDialog::new(Some(&ctx.window), Some("Détecteur de Spam"), Some(alert.message()));
            dialog.add_response("ok", "OK");
            dialog.set_default_response(Some("ok"));
            let ctx = ctx.clone();
            dialog.connect_response(None, move |_, _| {
                ctx.alert_open.set(false);
                ctx.view.borrow_mut().dismiss_alert();
                refresh(&ctx);
            });
            dialog.present();
        }
    }
}

fn submit(ctx: &Rc<Context>) {
    let text = ctx.view.borrow_mut().begin_submit();
    refresh(ctx);
    let Some(text) = text else {
        return;
    };
    let api = ctx.view.borrow().api();
    let ctx = ctx.clone();
    run_async_to_main(
        async move { api.predict(&text).await },
        move |outcome| {
            ctx.view.borrow_mut().finish_submit(outcome);
            refresh(&ctx);
        },
    );
}

/// Health and stats go out together; neither waits for the other.
fn initialize(ctx: &Rc<Context>) {
    let api = ctx.view.borrow().api();
    {
        let api = api.clone();
        let ctx = ctx.clone();
        run_async_to_main(async move { api.health().await }, move |res| {
            ctx.view.borrow_mut().apply_health(res);
            refresh(&ctx);
        });
    }
    let ctx = ctx.clone();
    run_async_to_main(async move { api.stats().await }, move |res| {
        ctx.view.borrow_mut().apply_stats(res);
        refresh(&ctx);
    });
}

pub fn show_main_window(app: &Application, api: ApiClient) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title(render::TITLE)
        .default_width(720)
        .default_height(760)
        .build();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 16);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    // Header
    let title = gtk::Label::new(Some(render::TITLE));
    title.add_css_class("title-1");
    root.append(&title);
    let subtitle = muted_label(render::SUBTITLE);
    subtitle.set_halign(gtk::Align::Center);
    root.append(&subtitle);
    let status = gtk::Label::new(None);
    status.add_css_class("heading");
    root.append(&status);

    // Input card
    let card = gtk::Box::new(gtk::Orientation::Vertical, 12);
    card.add_css_class("card");
    card.set_margin_top(8);
    let input_label = gtk::Label::new(Some(render::INPUT_LABEL));
    input_label.add_css_class("heading");
    input_label.set_halign(gtk::Align::Start);
    card.append(&input_label);

    let text_view = gtk::TextView::builder()
        .wrap_mode(gtk::WrapMode::WordChar)
        .top_margin(8)
        .bottom_margin(8)
        .left_margin(8)
        .right_margin(8)
        .build();
    let buffer = text_view.buffer();
    let scroller = gtk::ScrolledWindow::builder()
        .min_content_height(160)
        .hexpand(true)
        .child(&text_view)
        .build();
    let placeholder = muted_label(render::INPUT_PLACEHOLDER);
    placeholder.set_valign(gtk::Align::Start);
    placeholder.set_margin_top(8);
    placeholder.set_margin_start(10);
    placeholder.set_can_target(false);
    let input_overlay = gtk::Overlay::new();
    input_overlay.set_child(Some(&scroller));
    input_overlay.add_overlay(&placeholder);
    card.append(&input_overlay);

    let examples_row = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    examples_row.append(&muted_label(render::EXAMPLES_LABEL));
    let ham_btn = gtk::Button::with_label(render::HAM_BUTTON);
    ham_btn.add_css_class("pill");
    let spam_btn = gtk::Button::with_label(render::SPAM_BUTTON);
    spam_btn.add_css_class("pill");
    examples_row.append(&ham_btn);
    examples_row.append(&spam_btn);
    card.append(&examples_row);

    let submit_content = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    submit_content.set_halign(gtk::Align::Center);
    let spinner = gtk::Spinner::new();
    let submit_label = gtk::Label::new(None);
    submit_content.append(&spinner);
    submit_content.append(&submit_label);
    let submit_btn = gtk::Button::builder().child(&submit_content).build();
    submit_btn.add_css_class("suggested-action");
    card.append(&submit_btn);

    // Result
    let result_box = gtk::Box::new(gtk::Orientation::Vertical, 8);
    result_box.add_css_class("card");
    let result_headline = gtk::Label::new(None);
    result_headline.add_css_class("title-2");
    result_headline.set_halign(gtk::Align::Start);
    let result_description = muted_label("");
    let confidence_title = muted_label("📊 Niveau de confiance");
    let bar_row = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    let result_bar = gtk::ProgressBar::new();
    result_bar.set_hexpand(true);
    result_bar.set_valign(gtk::Align::Center);
    let result_percent = gtk::Label::new(None);
    result_percent.add_css_class("title-3");
    bar_row.append(&result_bar);
    bar_row.append(&result_percent);
    result_box.append(&result_headline);
    result_box.append(&result_description);
    result_box.append(&confidence_title);
    result_box.append(&bar_row);
    card.append(&result_box);
    root.append(&card);

    // Model stats
    let stats_box = gtk::Box::new(gtk::Orientation::Vertical, 8);
    stats_box.add_css_class("card");
    let stats_title = gtk::Label::new(Some("Performance du modèle"));
    stats_title.add_css_class("title-3");
    stats_title.set_halign(gtk::Align::Start);
    stats_box.append(&stats_title);
    stats_box.append(&muted_label("🎯 Précision globale"));
    let stats_accuracy = gtk::Label::new(None);
    stats_accuracy.add_css_class("title-1");
    stats_accuracy.set_halign(gtk::Align::Start);
    stats_box.append(&stats_accuracy);
    stats_box.append(&muted_label("🤖 Technologie"));
    let technology = gtk::Label::new(Some(render::TECHNOLOGY));
    technology.add_css_class("heading");
    technology.set_halign(gtk::Align::Start);
    stats_box.append(&technology);
    stats_box.append(&muted_label(render::TECHNOLOGY_NOTE));
    let stats_extra = gtk::Box::new(gtk::Orientation::Vertical, 4);
    stats_box.append(&stats_extra);
    root.append(&stats_box);

    for line in render::FOOTER {
        let footer = muted_label(line);
        footer.set_halign(gtk::Align::Center);
        root.append(&footer);
    }

    let page = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hscrollbar_policy(gtk::PolicyType::Never)
        .child(&root)
        .build();
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    container.append(&header);
    container.append(&page);
    window.set_content(Some(&container));

    let ctx = Rc::new(Context {
        window: window.clone(),
        view: RefCell::new(ClientView::new(Arc::new(api), StdRng::from_entropy())),
        widgets: Widgets {
            status,
            buffer: buffer.clone(),
            placeholder,
            submit_btn: submit_btn.clone(),
            submit_label,
            spinner,
            result_box,
            result_headline,
            result_description,
            result_bar,
            result_percent,
            stats_box,
            stats_accuracy,
            stats_extra,
        },
        alert_open: Cell::new(false),
    });

    {
        let ctx = ctx.clone();
        buffer.connect_changed(move |buf| {
            let text = buf.text(&buf.start_iter(), &buf.end_iter(), false);
            ctx.view.borrow_mut().edit_draft(text.as_str());
            refresh(&ctx);
        });
    }
    for (btn, category) in [(&ham_btn, Category::Ham), (&spam_btn, Category::Spam)] {
        let ctx = ctx.clone();
        btn.connect_clicked(move |_| {
            let sample = ctx.view.borrow_mut().load_example(category);
            // fires `changed`, which syncs the draft back
            ctx.widgets.buffer.set_text(sample);
            refresh(&ctx);
        });
    }
    {
        let ctx = ctx.clone();
        submit_btn.connect_clicked(move |_| submit(&ctx));
    }
    {
        // Ctrl+Enter submits, handled before the text view sees the key
        let ctx = ctx.clone();
        let keys = gtk::EventControllerKey::new();
        keys.set_propagation_phase(gtk::PropagationPhase::Capture);
        keys.connect_key_pressed(move |_, key, _, modifiers| {
            if is_submit_shortcut(key, modifiers) {
                submit(&ctx);
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });
        text_view.add_controller(keys);
    }

    refresh(&ctx);
    window.present();
    initialize(&ctx);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_enter_is_the_only_submit_shortcut() {
        let ctrl = gdk::ModifierType::CONTROL_MASK;
        assert!(is_submit_shortcut(gdk::Key::Return, ctrl));
        assert!(is_submit_shortcut(gdk::Key::KP_Enter, ctrl | gdk::ModifierType::SHIFT_MASK));
        assert!(!is_submit_shortcut(gdk::Key::Return, gdk::ModifierType::empty()));
        assert!(!is_submit_shortcut(gdk::Key::Return, gdk::ModifierType::SHIFT_MASK));
        assert!(!is_submit_shortcut(gdk::Key::a, ctrl));
    }
}
