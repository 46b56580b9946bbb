use crate::sequencer::NoteSequencer;

/// Tooltip line replaced with the attached song's name.
pub const SONG_NAME_PLACEHOLDER: &str = "SongName";

/// Tooltip lines the weapon declares before any substitution.
pub const BASE_TOOLTIP: &[&str] = &[SONG_NAME_PLACEHOLDER];

/// Replaces every placeholder line with `Song: <name>`.
pub fn apply_song_name(lines: &mut [String], name: &str) {
    for line in lines.iter_mut().rev() {
        if line == SONG_NAME_PLACEHOLDER {
            *line = format!("Song: {name}");
        }
    }
}

pub fn tooltip_lines(sequencer: &NoteSequencer) -> Vec<String> {
    let mut lines: Vec<String> = BASE_TOOLTIP.iter().map(|l| l.to_string()).collect();
    apply_song_name(&mut lines, &sequencer.current_song_display_name());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_placeholder_lines() {
        let mut lines = vec![
            "17 damage".to_string(),
            SONG_NAME_PLACEHOLDER.to_string(),
            "Average knockback".to_string(),
        ];
        apply_song_name(&mut lines, "Example Song");
        assert_eq!(lines[0], "17 damage");
        assert_eq!(lines[1], "Song: Example Song");
        assert_eq!(lines[2], "Average knockback");
    }
}
