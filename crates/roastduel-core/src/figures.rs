//! Display names for historical-figure personas.

use crate::duel::FigureId;

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("JuliusCaesar", "Julius Caesar"),
    ("WilliamShakespeare", "William Shakespeare"),
    ("GenghisKhan", "Genghis Khan"),
    ("NapoleonBonaparte", "Napoleon Bonaparte"),
    ("MarkTwain", "Mark Twain"),
    ("SunTzu", "Sun Tzu"),
    ("Socrates", "Socrates"),
    ("WinstonChurchill", "Winston Churchill"),
    ("MarieAntoinette", "Marie Antoinette"),
    ("LeonardoDaVinci", "Leonardo da Vinci"),
    ("OscarWilde", "Oscar Wilde"),
    ("AttilaTheHun", "Attila the Hun"),
    ("TheodoreRoosevelt", "Theodore Roosevelt"),
    ("BenjaminFranklin", "Benjamin Franklin"),
    ("HannibalBarca", "Hannibal Barca"),
    ("Confucius", "Confucius"),
    ("VladTheImpaler", "Vlad the Impaler"),
    ("NiccoloMachiavelli", "Niccolò Machiavelli"),
    ("KarlMarx", "Karl Marx"),
    ("FriedrichNietzsche", "Friedrich Nietzsche"),
    ("JoanOfArc", "Joan of Arc"),
    ("AndrewJackson", "Andrew Jackson"),
    ("OttoVonBismarck", "Otto von Bismarck"),
    ("SalvadorDali", "Salvador Dalí"),
    ("HarrietTubman", "Harriet Tubman"),
    ("NelsonMandela", "Nelson Mandela"),
    ("JohnFKennedy", "John F. Kennedy"),
    ("MartinLutherKingJr", "Martin Luther King Jr."),
    ("MalcolmX", "Malcolm X"),
    ("FrederickDouglass", "Frederick Douglass"),
];

/// Human-readable name of a figure. Unknown identifiers pass through as-is.
#[must_use]
pub fn display_name(figure: &FigureId) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(id, _)| *id == figure.as_str())
        .map_or(figure.as_str(), |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_figures_resolve() {
        assert_eq!(display_name(&FigureId::new("JuliusCaesar")), "Julius Caesar");
        assert_eq!(
            display_name(&FigureId::new("NiccoloMachiavelli")),
            "Niccolò Machiavelli"
        );
        assert_eq!(display_name(&FigureId::new("Socrates")), "Socrates");
    }

    #[test]
    fn test_unknown_figure_passes_through() {
        assert_eq!(display_name(&FigureId::new("Cleopatra")), "Cleopatra");
    }

    #[test]
    fn test_table_has_thirty_unique_figures() {
        let mut ids: Vec<&str> = DISPLAY_NAMES.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }
}
