//! Placeholder substitution in rule templates.

use crate::unit::CONVERSIONS;

/// Fill the unit placeholders of `template` from `total_seconds`.
///
/// Each pass scans the conversion table coarsest first and takes the first
/// placeholder present in the text. Its value is `floor(seconds / multiplier)`;
/// that many units are subtracted from the running total and the *first*
/// occurrence of the placeholder is replaced. Passes repeat until no
/// placeholder is left, so a placeholder that appears twice gets its second
/// value from whatever the total has been reduced to by then.
///
/// ```
/// use fuzzy_engine::render_template;
///
/// assert_eq!(render_template(93_784, "%d d %h h %m m %s s"), "1 d 2 h 3 m 4 s");
/// assert_eq!(render_template(7_200, "%m minutes"), "120 minutes");
/// ```
pub fn render_template(total_seconds: i64, template: &str) -> String {
    let mut seconds = total_seconds;
    let mut rendered = template.to_string();

    while let Some(conversion) = CONVERSIONS
        .iter()
        .find(|c| rendered.contains(c.placeholder))
    {
        let value = seconds.div_euclid(conversion.seconds);
        seconds -= value * conversion.seconds;
        rendered = rendered.replacen(conversion.placeholder, &value.to_string(), 1);
    }

    rendered
}
