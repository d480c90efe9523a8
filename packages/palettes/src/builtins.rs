//! Default palettes seeded into an empty store.

use crate::palette::Palette;

/// (name, emojis) of the builtin palettes, in display order
pub const BUILTIN_PALETTES: &[(&str, &str)] = &[
    ("Vehicles", "🚙🚗🚘🚕🚖🏎🚚🛻🚛🚐🚓🚔🚑🚒🚀✈🛫🛬🛩🚁🛸🚲🏍🛶⛵🚤🛥🛳⛴🚢🚂🚝🚅🚆🚊🚉🚇🛺🚜"),
    ("Sports", "🏈⚾🏀⚽🎾🏐🥏🏓⛳🥅🥌🏂⛷🎳"),
    ("Music", "🎼🎤🎹🪘🥁🎺🪗🪕🎻"),
    (
        "Animals",
        "🐥🐣🐂🐄🐎🐖🐏🐑🦙🐐🐓🐁🐀🐒🦆🦅🦉🦇🐢🐍🦎🦖🦕🐅🐆🦓🦍🦧🦣🐘🦛🦏🐪🐫🦒🦘🦬🐃🦌🐕🐩🦮🐈🦤🦢🦩🕊🦝🦨🦡🦫🦦🦥🐿🦔",
    ),
    ("Animal Faces", "🐵🙈🙊🙉🐶🐱🐭🐹🐰🦊🐻🐼🐨🐯🦁🐮🐷🐸🐲"),
    ("Flora", "🌲🌴🌿☘🍀🍁🍄🌾💐🌷🌹🥀🌺🌸🌼🌻"),
    ("Weather", "☀🌤⛅🌥☁🌦🌧⛈🌩🌨❄💨☔💧💦🌊☂🌫🌪"),
    ("COVID", "💉🦠😷🤧🤒"),
    (
        "Faces",
        "😀😃😄😁😆😅😂🤣🥲😊😇🙂🙃😉😌😍🥰😘😗😙😚😋😛😝😜🤪🤨🧐🤓😎🥸🤩🥳😏😞😔😟😕🙁☹😣😖😫😩🥺😢😭😤😠😡🤯😳🥶😥😓🤗🤔🤭🤫🤥😬🙄😯😧🥱😴🤮🤠",
    ),
];

/// Fresh copies of the builtin palettes. Each call assigns new ids.
pub fn builtins() -> Vec<Palette> {
    BUILTIN_PALETTES
        .iter()
        .map(|(name, emojis)| Palette::new(*name, *emojis))
        .collect()
}
