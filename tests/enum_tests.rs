mod support;

use schema2model::generator::enums::{
    find_enum_member_name, synthesize_enums, EnumMembers, IdentifierGenerator, RandomIdentifiers,
};
use schema2model::generator::GeneratorOptions;
use schema2model::parser::names::ReservedWords;
use schema2model::parser::schema::Literal;

use support::{generate_fixture, load_fixture_snapshot};

fn member_names(members: &EnumMembers) -> Vec<String> {
    members.iter().map(|m| m.name.clone()).collect()
}

#[test]
fn check_constraints_become_enums_in_literal_order() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());

    let names: Vec<&str> = output.enums.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["users_role", "orders_status"]);

    assert_eq!(member_names(&output.enums[0].members), ["admin", "member", "guest"]);
    assert_eq!(output.enums[0].columns, ["users.role"]);
    assert_eq!(
        member_names(&output.enums[1].members),
        ["pending", "paid", "shipped", "cancelled"]
    );
}

#[test]
fn numeric_domains_get_generated_member_names() {
    let schema = load_fixture_snapshot("snapshot");
    let enums = synthesize_enums(
        &schema,
        &ReservedWords::default(),
        &mut RandomIdentifiers::seeded(9),
    );

    assert_eq!(enums.len(), 1);
    assert_eq!(enums[0].name, "messages_priority");
    assert_eq!(enums[0].columns, ["public.messages.priority"]);
    let names = member_names(&enums[0].members);
    assert_eq!(names.len(), 3);
    for name in &names {
        assert_eq!(name.len(), 8);
        assert!(name.chars().all(|ch| ch.is_ascii_lowercase()), "{name}");
    }
    let values: Vec<&Literal> = enums[0].members.iter().map(|m| &m.value).collect();
    assert_eq!(
        values,
        [&Literal::Integer(1), &Literal::Integer(2), &Literal::Integer(3)]
    );
}

#[test]
fn seeded_generation_is_reproducible() {
    let schema = load_fixture_snapshot("snapshot");
    let reserved = ReservedWords::default();
    let first = synthesize_enums(&schema, &reserved, &mut RandomIdentifiers::seeded(11));
    let second = synthesize_enums(&schema, &reserved, &mut RandomIdentifiers::seeded(11));
    assert_eq!(first, second);
}

struct Counter(usize);

impl IdentifierGenerator for Counter {
    fn next_identifier(&mut self) -> String {
        self.0 += 1;
        format!("member {}", self.0)
    }
}

#[test]
fn generated_names_are_normalized_and_unique() {
    let mut members = EnumMembers::default();
    members.insert("member_1".to_string(), Literal::Null);

    let name = find_enum_member_name(
        &Literal::Boolean(true),
        &members,
        &ReservedWords::default(),
        &mut Counter(0),
    );
    assert_eq!(name, "member_2");
}

#[test]
fn reserved_literals_get_trailing_underscores() {
    let name = find_enum_member_name(
        &Literal::from("None"),
        &EnumMembers::default(),
        &ReservedWords::default(),
        &mut Counter(0),
    );
    assert_eq!(name, "None_");
}
