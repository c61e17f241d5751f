//! Distinguished Name parsing tests

use cades_facade::dn::{self, DistinguishedName, Field};
use rstest::rstest;

fn expected(fields: &[(Field, &str)]) -> DistinguishedName {
    let mut dn = DistinguishedName::default();
    for (field, value) in fields {
        dn.set(*field, *value);
    }
    dn
}

#[rstest]
#[case::cyrillic(
    "CN=Иванов Иван,O=ООО Ромашка,E=test@example.com",
    &[(Field::Name, "Иванов Иван"), (Field::Company, "ООО Ромашка"), (Field::Email, "test@example.com")]
)]
#[case::quoted_comma(r#"CN="Smith, John",O=Acme"#, &[(Field::Name, "Smith, John"), (Field::Company, "Acme")])]
#[case::doubled_quotes(r#"T=""Director"""#, &[(Field::Post, r#""Director""#)])]
#[case::unknown_tag("XX=foo,CN=Bar", &[(Field::Name, "Bar")])]
#[case::spaced("CN=Bar, O=Acme, L=Москва", &[(Field::Name, "Bar"), (Field::Company, "Acme"), (Field::City, "Москва")])]
#[case::empty_value("CN=,O=Acme", &[(Field::Name, ""), (Field::Company, "Acme")])]
#[case::trailing_value("O=Acme,CN=", &[(Field::Name, ""), (Field::Company, "Acme")])]
#[case::space_before_comma("CN=Bar ,O=Acme", &[(Field::Name, "Bar "), (Field::Company, "Acme")])]
#[case::leading_text("garbage CN=Bar", &[(Field::Name, "Bar")])]
#[case::no_tags("just text, no tags", &[])]
#[case::empty("", &[])]
fn parse(#[case] input: &str, #[case] fields: &[(Field, &str)]) {
    assert_eq!(dn::parse(input), expected(fields));
}

// Every tag in the translation table maps to its field.
#[test]
fn all_tags() {
    let input = "CN=a, S=b, STREET=c, O=d, OU=e, T=f, ОГРН=g, СНИЛС=h, ИНН=i, E=j, L=k";
    let parsed = dn::parse(input);

    let values: Vec<_> = parsed.iter().map(|(f, v)| (f.key(), v)).collect();
    assert_eq!(
        values,
        vec![
            ("name", "a"),
            ("region", "b"),
            ("address", "c"),
            ("company", "d"),
            ("postType", "e"),
            ("post", "f"),
            ("ogrn", "g"),
            ("snils", "h"),
            ("inn", "i"),
            ("email", "j"),
            ("city", "k"),
        ]
    );
}

// Providers also emit Latin spellings of the registry tags.
#[test]
fn latin_registry_tags() {
    let parsed = dn::parse("OGRN=1027700132195, SNILS=12345678901, INN=007701234567");
    assert_eq!(parsed.ogrn.as_deref(), Some("1027700132195"));
    assert_eq!(parsed.snils.as_deref(), Some("12345678901"));
    assert_eq!(parsed.inn.as_deref(), Some("007701234567"));
}

// When a tag repeats, the first occurrence in the string wins.
#[test]
fn first_occurrence_wins() {
    let parsed = dn::parse("OU=Sales, CN=Bar, OU=Marketing, OU=Support");
    assert_eq!(parsed.post_type.as_deref(), Some("Sales"));
    assert_eq!(parsed.name.as_deref(), Some("Bar"));
}

// A quoted value can contain anything but a `TAG=` sequence.
#[test]
fn quoted_street() {
    let parsed = dn::parse(r#"STREET="ул. Ленина, д. 1, кв. 2", L=Москва"#);
    assert_eq!(parsed.address.as_deref(), Some("ул. Ленина, д. 1, кв. 2"));
    assert_eq!(parsed.city.as_deref(), Some("Москва"));
}

#[test]
fn nested_quotes() {
    let parsed = dn::parse(r#"CN="УЦ ""Тест""", O="ООО ""Тест""""#);
    assert_eq!(parsed.name.as_deref(), Some(r#"УЦ "Тест""#));
    assert_eq!(parsed.company.as_deref(), Some(r#"ООО "Тест""#));
}

// Rendering the canonical form and parsing it again yields the same fields.
#[rstest]
#[case("CN=Иванов Иван,O=ООО Ромашка,E=test@example.com")]
#[case(r#"CN="Smith, John",O=Acme"#)]
#[case(r#"T=""Director"""#)]
#[case(r#"CN="УЦ ""Тест""", STREET="ул. Ленина, д. 1", ИНН=007701234567"#)]
#[case("CN=,O=Acme")]
fn canonical_round_trip(#[case] input: &str) {
    let parsed = dn::parse(input);
    let canonical = parsed.to_string();
    assert_eq!(dn::parse(&canonical), parsed, "canonical form: {canonical}");
}

#[test]
fn canonical_form() {
    let parsed = dn::parse(r#"O=Acme, CN="Smith, John""#);
    assert_eq!(parsed.to_string(), r#"CN="Smith, John", O="Acme""#);
}

#[test]
fn serialize() {
    let parsed = dn::parse(r#"CN="Smith, John",O=Acme"#);
    insta::assert_json_snapshot!(parsed, @r#"
    {
      "name": "Smith, John",
      "company": "Acme"
    }
    "#);
}
