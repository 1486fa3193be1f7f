//! Keysym names and the default keybindings.
//!
//! Only the keysyms useful for tiling chords are named here: modifiers,
//! navigation and editing keys, the keypad, function keys, and the Latin
//! letters and digits.

use std::collections::BTreeMap;

use crate::tiling::Action;

/// Named keysyms outside the Latin-1 letter and digit ranges.
const NAMED_KEYSYMS: &[(&str, u32)] = &[
    ("space", 0x0020),
    ("BackSpace", 0xff08),
    ("Tab", 0xff09),
    ("Return", 0xff0d),
    ("Pause", 0xff13),
    ("Scroll_Lock", 0xff14),
    ("Escape", 0xff1b),
    ("Home", 0xff50),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Prior", 0xff55),
    ("Page_Up", 0xff55),
    ("Next", 0xff56),
    ("Page_Down", 0xff56),
    ("End", 0xff57),
    ("Print", 0xff61),
    ("Insert", 0xff63),
    ("Menu", 0xff67),
    ("Num_Lock", 0xff7f),
    ("KP_Enter", 0xff8d),
    ("KP_Home", 0xff95),
    ("KP_Left", 0xff96),
    ("KP_Up", 0xff97),
    ("KP_Right", 0xff98),
    ("KP_Down", 0xff99),
    ("KP_Prior", 0xff9a),
    ("KP_Page_Up", 0xff9a),
    ("KP_Next", 0xff9b),
    ("KP_Page_Down", 0xff9b),
    ("KP_End", 0xff9c),
    ("KP_Begin", 0xff9d),
    ("KP_Insert", 0xff9e),
    ("KP_Delete", 0xff9f),
    ("KP_Multiply", 0xffaa),
    ("KP_Add", 0xffab),
    ("KP_Subtract", 0xffad),
    ("KP_Decimal", 0xffae),
    ("KP_Divide", 0xffaf),
    ("Shift_L", 0xffe1),
    ("Shift_R", 0xffe2),
    ("Control_L", 0xffe3),
    ("Control_R", 0xffe4),
    ("Caps_Lock", 0xffe5),
    ("Meta_L", 0xffe7),
    ("Meta_R", 0xffe8),
    ("Alt_L", 0xffe9),
    ("Alt_R", 0xffea),
    ("Super_L", 0xffeb),
    ("Super_R", 0xffec),
    ("Hyper_L", 0xffed),
    ("Hyper_R", 0xffee),
    ("Delete", 0xffff),
];

const XK_KP_0: u32 = 0xffb0;
const XK_F1: u32 = 0xffbe;

/// Looks up a keysym by its X11 name (`Super_L`, `KP_Add`, `F5`, `q`).
///
/// `Space` is accepted as an alias of `space`.
#[must_use]
pub fn from_name(name: &str) -> Option<u32> {
    if let Some((_, keysym)) = NAMED_KEYSYMS.iter().find(|(n, _)| *n == name) {
        return Some(*keysym);
    }

    if name == "Space" {
        return Some(0x0020);
    }

    // Latin letters and digits map to their ASCII codes
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && (c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Some(u32::from(c));
    }

    if let Some(digit) = name.strip_prefix("KP_").and_then(|d| d.parse::<u32>().ok())
        && digit <= 9
    {
        return Some(XK_KP_0 + digit);
    }

    name.strip_prefix('F')
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| (1..=35).contains(n))
        .map(|n| XK_F1 + n - 1)
}

/// Returns the default keybindings: arrows and the numeric keypad.
///
/// ```text
/// KP_Home  KP_Up    KP_Prior      top-left     top-center     top-right
/// KP_Left  KP_Begin KP_Right  ->  left         center         right
/// KP_End   KP_Down  KP_Next       bottom-left  bottom-center  bottom-right
/// ```
#[must_use]
pub fn default_keybindings() -> BTreeMap<String, Action> {
    [
        ("Up", Action::Max),
        ("Down", Action::Center),
        ("Left", Action::Left),
        ("Right", Action::Right),
        ("space", Action::Restore),
        ("KP_Home", Action::TopLeft),
        ("KP_Up", Action::TopCenter),
        ("KP_Page_Up", Action::TopRight),
        ("KP_Left", Action::Left),
        ("KP_Begin", Action::Center),
        ("KP_Right", Action::Right),
        ("KP_End", Action::BottomLeft),
        ("KP_Down", Action::BottomCenter),
        ("KP_Page_Down", Action::BottomRight),
        ("KP_Insert", Action::Restore),
        ("KP_Prior", Action::TopRight),
        ("KP_Next", Action::BottomRight),
        ("KP_Add", Action::Bigger),
        ("KP_Subtract", Action::Smaller),
    ]
    .into_iter()
    .map(|(name, action)| (name.to_string(), action))
    .collect()
}

// ============================================================================
// Tests
// ============================================================================
