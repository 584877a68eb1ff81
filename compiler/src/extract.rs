//! Choice and range extraction from argument slots.

use std::collections::HashMap;
use std::fmt;

use slash_schema_core::{Choice, NumericValue, Range};

use crate::tree::{ParserKind, ParserSpec, SuggestionSource};

/// Returns the static choices of a suggestion source.
///
/// Only [`SuggestionSource::Choices`] yields values. Dynamic providers are
/// served at runtime and are never called here.
pub fn extract_choices(source: &SuggestionSource) -> Vec<Choice> {
    match source {
        SuggestionSource::Choices(choices) => choices.clone(),
        SuggestionSource::None | SuggestionSource::Dynamic(_) => Vec::new(),
    }
}

/// Maps a parser to the range it accepts, or `None` if it declares none.
pub type RangeMapper = Box<dyn Fn(&ParserSpec) -> Option<Range> + Send + Sync>;

/// Registry of range mappers keyed by parser kind.
///
/// Seeded with the bounded numeric parsers (byte, short, integer, long, float
/// and double). A declared bound is kept; a missing one is filled with the
/// parser's natural limit.
///
/// # Examples
///
/// ```
/// use slash_schema_compiler::{ParserKind, ParserSpec, RangeExtractor};
/// use slash_schema_core::Range;
///
/// let extractor = RangeExtractor::new();
/// let bounded = ParserSpec::new(ParserKind::Integer).with_bounds(1, 10);
/// assert_eq!(extractor.extract(&bounded), Some(Range::new(1, 10)));
///
/// let byte = ParserSpec::new(ParserKind::Byte).with_min(0);
/// assert_eq!(extractor.extract(&byte), Some(Range::new(0, 127)));
///
/// assert_eq!(extractor.extract(&ParserSpec::new(ParserKind::Integer)), None);
/// assert_eq!(extractor.extract(&ParserSpec::new(ParserKind::String).with_min(1)), None);
/// ```
pub struct RangeExtractor {
    mappers: HashMap<ParserKind, RangeMapper>,
}

impl fmt::Debug for RangeExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.mappers.keys().map(ToString::to_string).collect();
        kinds.sort();
        f.debug_struct("RangeExtractor")
            .field("kinds", &kinds)
            .finish()
    }
}

impl Default for RangeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeExtractor {
    pub fn new() -> Self {
        let mut extractor = Self {
            mappers: HashMap::new(),
        };
        extractor
            .register(
                ParserKind::Byte,
                integral(i64::from(i8::MIN), i64::from(i8::MAX)),
            )
            .register(
                ParserKind::Short,
                integral(i64::from(i16::MIN), i64::from(i16::MAX)),
            )
            .register(
                ParserKind::Integer,
                integral(i64::from(i32::MIN), i64::from(i32::MAX)),
            )
            .register(ParserKind::Long, integral(i64::MIN, i64::MAX))
            .register(
                ParserKind::Float,
                floating(f64::from(f32::MIN), f64::from(f32::MAX)),
            )
            .register(ParserKind::Double, floating(f64::MIN, f64::MAX));
        extractor
    }

    /// Registers `mapper` for `kind`, replacing any earlier mapper.
    pub fn register(&mut self, kind: ParserKind, mapper: RangeMapper) -> &mut Self {
        self.mappers.insert(kind, mapper);
        self
    }

    /// Returns true if a mapper exists for `kind`.
    pub fn supports(&self, kind: &ParserKind) -> bool {
        self.mappers.contains_key(kind)
    }

    /// Extracts the range of `parser`. Unknown parser kinds have none.
    pub fn extract(&self, parser: &ParserSpec) -> Option<Range> {
        let mapper = self.mappers.get(&parser.kind)?;
        mapper(parser)
    }
}

/// Range mapper for integral parsers with the given natural limits.
///
/// Fractional bounds are narrowed to the integers the parser accepts.
pub fn integral(lower: i64, upper: i64) -> RangeMapper {
    Box::new(move |parser| {
        if !parser.has_bounds() {
            return None;
        }
        let min = parser.min.map_or(lower, |value| value.ceil_i64());
        let max = parser.max.map_or(upper, |value| value.floor_i64());
        Some(Range::new(min, max))
    })
}

/// Range mapper for floating point parsers with the given natural limits.
pub fn floating(lower: f64, upper: f64) -> RangeMapper {
    Box::new(move |parser| {
        if !parser.has_bounds() {
            return None;
        }
        let min = parser.min.map_or(lower, |value| value.as_f64());
        let max = parser.max.map_or(upper, |value| value.as_f64());
        Some(Range {
            min: NumericValue::Float(min),
            max: NumericValue::Float(max),
        })
    })
}

#[cfg(test)]
mod tests {
    use slash_schema_core::ChoiceValue;

    use super::*;

    #[test]
    fn test_only_static_choices_are_extracted() {
        let choices = SuggestionSource::Choices(Choice::strings(["cat", "dog"]));
        assert_eq!(extract_choices(&choices).len(), 2);
        assert!(extract_choices(&SuggestionSource::Dynamic("players".into())).is_empty());
        assert!(extract_choices(&SuggestionSource::None).is_empty());
    }

    #[test]
    fn test_float_ranges_are_floating() {
        let extractor = RangeExtractor::new();
        let range = extractor
            .extract(&ParserSpec::new(ParserKind::Double).with_bounds(0, 1))
            .unwrap();
        assert_eq!(range.min, NumericValue::Float(0.0));
        assert_eq!(range.max, NumericValue::Float(1.0));
    }

    #[test]
    fn test_missing_bound_uses_natural_limit() {
        let extractor = RangeExtractor::new();
        let range = extractor
            .extract(&ParserSpec::new(ParserKind::Short).with_max(5))
            .unwrap();
        assert_eq!(range, Range::new(i64::from(i16::MIN), 5));
    }

    #[test]
    fn test_fractional_min_rounds_up() {
        let extractor = RangeExtractor::new();
        let range = extractor
            .extract(&ParserSpec::new(ParserKind::Integer).with_bounds(0.5, 10))
            .unwrap();
        assert_eq!(range, Range::new(1, 10));

        let negative = extractor
            .extract(&ParserSpec::new(ParserKind::Integer).with_min(-2.5))
            .unwrap();
        assert_eq!(negative.min, NumericValue::Integer(-2));
    }

    #[test]
    fn test_fractional_max_rounds_down() {
        let extractor = RangeExtractor::new();
        let range = extractor
            .extract(&ParserSpec::new(ParserKind::Integer).with_bounds(0, 9.9))
            .unwrap();
        assert_eq!(range, Range::new(0, 9));

        let negative = extractor
            .extract(&ParserSpec::new(ParserKind::Short).with_max(-0.5))
            .unwrap();
        assert_eq!(negative.max, NumericValue::Integer(-1));
    }

    #[test]
    fn test_custom_mapper() {
        let mut extractor = RangeExtractor::new();
        let percent = ParserKind::Other("percent".into());
        assert!(!extractor.supports(&percent));

        extractor.register(percent.clone(), Box::new(|_| Some(Range::new(0, 100))));
        assert_eq!(
            extractor.extract(&ParserSpec::new(percent)),
            Some(Range::new(0, 100))
        );
    }

    #[test]
    fn test_choice_values_are_copied() {
        let source = SuggestionSource::Choices(Choice::integers([1, 2]));
        let choices = extract_choices(&source);
        assert_eq!(choices[0].value, ChoiceValue::Integer(1));
    }
}
