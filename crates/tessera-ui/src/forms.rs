//! Prebuilt dialogue forms: alert and yes/no confirmation.
//!
//! Builders assemble a [`Dialogue`] with a message label and buttons and
//! hand back a shared result cell. The driver polls the cell and closes
//! the form once a choice lands.

use std::cell::Cell;
use std::rc::Rc;

use tessera_skin::SkinFile;
use tessera_types::error::Result;
use tessera_types::resource::{ResourceGroup, ResourceLoader};

use crate::button::Button;
use crate::dialogue::Dialogue;
use crate::label::Label;
use crate::push;
use crate::widget::Widget;

/// An informational dialogue with a single OK button.
///
/// Returns the form and a flag that flips when OK is clicked.
pub fn alert_form(
    skin: &SkinFile,
    loader: &mut dyn ResourceLoader,
    group: ResourceGroup,
    title: &str,
    message: &str,
) -> Result<(Dialogue, Rc<Cell<bool>>)> {
    let acknowledged = Rc::new(Cell::new(false));

    let mut dialogue = Dialogue::new(title);
    dialogue.init(skin, None, loader, group)?;

    let mut label = Label::new(message);
    label.init(skin, None, loader, group)?;

    let mut ok = Button::new("OK");
    ok.init(skin, None, loader, group)?;
    let flag = Rc::clone(&acknowledged);
    ok.on_click(move |_| flag.set(true));

    size_to_content(&mut dialogue, &[label.core().width(), ok.core().width()]);

    let label_slot = dialogue.add(Box::new(label)).map_err(|e| e.error)?;
    let ok_slot = dialogue.add(Box::new(ok)).map_err(|e| e.error)?;

    arrange_rows(&mut dialogue, label_slot, &[ok_slot]);
    Ok((dialogue, acknowledged))
}

/// A confirmation dialogue with Yes and No buttons.
///
/// The cell holds `None` until a choice is made.
pub fn yes_no_form(
    skin: &SkinFile,
    loader: &mut dyn ResourceLoader,
    group: ResourceGroup,
    title: &str,
    message: &str,
) -> Result<(Dialogue, Rc<Cell<Option<bool>>>)> {
    let choice: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    let mut dialogue = Dialogue::new(title);
    dialogue.init(skin, None, loader, group)?;

    let mut label = Label::new(message);
    label.init(skin, None, loader, group)?;

    let mut yes = Button::new("Yes");
    yes.init(skin, None, loader, group)?;
    let yes_flag = Rc::clone(&choice);
    yes.on_click(move |_| yes_flag.set(Some(true)));

    let mut no = Button::new("No");
    no.init(skin, None, loader, group)?;
    let no_flag = Rc::clone(&choice);
    no.on_click(move |_| no_flag.set(Some(false)));

    size_to_content(
        &mut dialogue,
        &[
            label.core().width(),
            yes.core().width() + no.core().width() + 8,
        ],
    );

    let label_slot = dialogue.add(Box::new(label)).map_err(|e| e.error)?;
    let yes_slot = dialogue.add(Box::new(yes)).map_err(|e| e.error)?;
    let no_slot = dialogue.add(Box::new(no)).map_err(|e| e.error)?;

    arrange_rows(&mut dialogue, label_slot, &[yes_slot, no_slot]);
    Ok((dialogue, choice))
}

const MARGIN: u32 = 10;

fn size_to_content(dialogue: &mut Dialogue, widths: &[u32]) {
    let content = widths.iter().copied().max().unwrap_or(0);
    let width = (content + 2 * MARGIN).max(dialogue.core().min_width);
    dialogue.core_mut().set_size(width, 90);
}

/// Message centered in the upper half, buttons side by side near the
/// bottom.
fn arrange_rows(
    dialogue: &mut Dialogue,
    label: crate::container::SlotId,
    buttons: &[crate::container::SlotId],
) {
    if let Some(widget) = dialogue.slots_mut().child_mut(label) {
        let core = widget.core_mut();
        push::to_horizontal_center(core);
        core.y = 8;
    }

    let button_cores: Vec<u32> = buttons
        .iter()
        .filter_map(|slot| dialogue.slots().child(*slot))
        .map(|w| w.core().width())
        .collect();
    let total: u32 = button_cores.iter().sum::<u32>() + 8 * (button_cores.len() as u32 - 1);

    let mut x = {
        let bounds_width = dialogue
            .slots()
            .child(label)
            .map(|w| w.core().boundaries.width)
            .unwrap_or(0);
        (bounds_width as i32 - total as i32) / 2
    };
    for slot in buttons {
        if let Some(widget) = dialogue.slots_mut().child_mut(*slot) {
            let core = widget.core_mut();
            core.x = x;
            push::from_side(core, 8, push::Side::Bottom);
            x += core.width() as i32 + 8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FrameClock;
    use crate::test_utils::{test_skin, StubLoader};
    use crate::widget::UpdateContext;
    use tessera_types::config::UiConfig;
    use tessera_types::diag::RecordingDiagnostics;
    use tessera_types::input::{InputState, MouseButton};
    use tessera_types::ViewRect;

    fn drive(dialogue: &mut Dialogue, input: &InputState) {
        let clock = FrameClock::new();
        let config = UiConfig::default();
        let mut diag = RecordingDiagnostics::new();
        let mut ctx = UpdateContext {
            input,
            clock: &clock,
            config: &config,
            diag: &mut diag,
        };
        dialogue.update(&mut ctx);
    }

    fn click_at(dialogue: &mut Dialogue, x: i32, y: i32) {
        let mut input = InputState::new();
        input.set_mouse_position(x, y);
        input.press(MouseButton::Left);
        drive(dialogue, &input);
        input.begin_frame();
        input.release(MouseButton::Left);
        drive(dialogue, &input);
    }

    fn button_center(dialogue: &Dialogue, label: &str) -> (i32, i32) {
        for (_, widget) in dialogue.slots().iter() {
            if let Some(button) = widget.as_any().downcast_ref::<Button>()
                && button.label == label
            {
                let r = widget.core().visible_rect();
                return (r.x + r.width as i32 / 2, r.y + r.height as i32 / 2);
            }
        }
        panic!("no button labeled {label}");
    }

    fn prepared<T>(pair: (Dialogue, T)) -> (Dialogue, T) {
        let (mut dialogue, result) = pair;
        let core = dialogue.core_mut();
        core.boundaries = ViewRect::new(0, 0, 640, 480);
        core.master_boundaries = core.boundaries;
        (dialogue, result)
    }

    #[test]
    fn alert_builds_label_and_button() {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let (dialogue, acknowledged) =
            prepared(alert_form(&skin, &mut loader, 0, "Note", "Saved!").unwrap());
        assert_eq!(dialogue.slots().child_count(), 2);
        assert!(!acknowledged.get());
    }

    #[test]
    fn alert_ok_sets_flag() {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let (mut dialogue, acknowledged) =
            prepared(alert_form(&skin, &mut loader, 0, "Note", "Saved!").unwrap());
        // Frames must run once so child frames are synced.
        let input = InputState::new();
        drive(&mut dialogue, &input);

        let (x, y) = button_center(&dialogue, "OK");
        click_at(&mut dialogue, x, y);
        assert!(acknowledged.get());
    }

    #[test]
    fn yes_no_reports_choice() {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let (mut dialogue, choice) =
            prepared(yes_no_form(&skin, &mut loader, 0, "Quit", "Really quit?").unwrap());
        let input = InputState::new();
        drive(&mut dialogue, &input);
        assert_eq!(choice.get(), None);

        let (x, y) = button_center(&dialogue, "No");
        click_at(&mut dialogue, x, y);
        assert_eq!(choice.get(), Some(false));
    }

    #[test]
    fn yes_no_buttons_do_not_overlap() {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let (mut dialogue, _choice) =
            prepared(yes_no_form(&skin, &mut loader, 0, "Quit", "Really?").unwrap());
        let input = InputState::new();
        drive(&mut dialogue, &input);
        let yes = button_center(&dialogue, "Yes");
        let no = button_center(&dialogue, "No");
        assert_ne!(yes.0, no.0);
    }

    #[test]
    fn dialogue_wide_enough_for_message() {
        let skin = test_skin();
        let mut loader = StubLoader::new();
        let (dialogue, _ack) = prepared(
            alert_form(
                &skin,
                &mut loader,
                0,
                "Note",
                "a rather long informational message",
            )
            .unwrap(),
        );
        for (_, widget) in dialogue.slots().iter() {
            assert!(widget.core().width() <= dialogue.core().width());
        }
    }
}
