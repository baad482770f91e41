mod support;

use schema2model::classifier::cardinality::RelationType;
use schema2model::generator::GeneratorOptions;

use support::{attribute_names, generate_fixture, table};

#[test]
fn shop_attribute_names_follow_foreign_keys() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());

    assert_eq!(attribute_names(&output, "users"), ["profile", "orders"]);
    assert_eq!(attribute_names(&output, "profiles"), ["user"]);
    assert_eq!(attribute_names(&output, "orders"), ["user", "order_items"]);
    assert_eq!(attribute_names(&output, "order_items"), ["order", "product"]);
    assert_eq!(attribute_names(&output, "products"), ["order_items", "categories"]);
    assert_eq!(
        attribute_names(&output, "categories"),
        ["parent", "sub_categories", "products"]
    );
    assert_eq!(
        attribute_names(&output, "employees"),
        ["related_employees", "employees"]
    );
}

#[test]
fn bridge_tables_get_no_relationships_of_their_own() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());
    assert!(output.registry.get(&table("product_categories")).is_empty());
    assert!(output.registry.get(&table("employee_relationships")).is_empty());
}

#[test]
fn every_end_has_a_symmetric_twin() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());
    output
        .registry
        .validate_symmetry()
        .expect("registry should be symmetric");

    for (owner, descriptors) in output.registry.iter() {
        for descriptor in descriptors {
            let twin = output
                .registry
                .get(&descriptor.target_table)
                .iter()
                .find(|t| t.attribute_name == descriptor.back_populates)
                .unwrap_or_else(|| panic!("{owner}.{} has no twin", descriptor.attribute_name));
            assert_eq!(twin.back_populates, descriptor.attribute_name);
            assert_eq!(&twin.target_table, owner);
            assert_eq!(twin.relation_type, descriptor.relation_type.inverse());
        }
    }
}

#[test]
fn cardinality_and_nullability_per_end() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());

    let profile = &output.registry.get(&table("users"))[0];
    assert_eq!(profile.relation_type, RelationType::OneToOne);
    assert!(profile.nullable);

    let user = &output.registry.get(&table("profiles"))[0];
    assert_eq!(user.relation_type, RelationType::OneToOne);
    assert!(!user.nullable);

    let orders = &output.registry.get(&table("users"))[1];
    assert_eq!(orders.relation_type, RelationType::OneToMany);
    assert!(!orders.nullable);

    let parent = &output.registry.get(&table("categories"))[0];
    assert_eq!(parent.relation_type, RelationType::ManyToOne);
    assert!(parent.nullable, "parent_id is nullable");
}

#[test]
fn many_to_many_ends_name_the_bridge() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());

    let categories = &output.registry.get(&table("products"))[1];
    assert_eq!(categories.relation_type, RelationType::ManyToMany);
    assert_eq!(categories.secondary_table.as_deref(), Some("ProductCategories"));
    assert_eq!(categories.back_populates, "products");
    assert!(!categories.nullable);
    assert!(categories.primaryjoin.is_none());

    let products = &output.registry.get(&table("categories"))[2];
    assert_eq!(products.target_class, "Products");
    assert_eq!(products.back_populates, "categories");
}

#[test]
fn self_referencing_bridge_carries_explicit_joins() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());
    let ends = output.registry.get(&table("employees"));

    let related = &ends[0];
    assert_eq!(related.back_populates, "employees");
    assert_eq!(related.secondary_table.as_deref(), Some("EmployeeRelationships"));
    assert_eq!(
        related.primaryjoin.as_deref(),
        Some("id == EmployeeRelationships.c.employee_id")
    );
    assert_eq!(
        related.secondaryjoin.as_deref(),
        Some("id == EmployeeRelationships.c.related_employee_id")
    );

    let reverse = &ends[1];
    assert_eq!(reverse.back_populates, "related_employees");
    assert_eq!(reverse.primaryjoin, related.secondaryjoin);
    assert_eq!(reverse.secondaryjoin, related.primaryjoin);
}

#[test]
fn self_referencing_foreign_key_sets_remote_side() {
    let (_, output) = generate_fixture("shop", &GeneratorOptions::default());
    let ends = output.registry.get(&table("categories"));

    let parent = &ends[0];
    let remote: Vec<String> = parent
        .remote_side
        .as_ref()
        .expect("owning end names the remote side")
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(remote, ["Categories.id"]);
    assert_eq!(parent.back_populates, "sub_categories");
    assert!(ends[1].remote_side.is_none());
}

#[test]
fn ternary_tables_are_flagged_and_resolved_directly() {
    let (_, output) = generate_fixture("ternary", &GeneratorOptions::default());

    assert_eq!(output.registry.ternary_tables(), [table("enrollments")]);
    assert_eq!(
        attribute_names(&output, "enrollments"),
        ["student", "course", "instructor"]
    );
    for target in ["students", "courses", "instructors"] {
        let ends = output.registry.get(&table(target));
        assert_eq!(ends.len(), 1);
        assert_eq!(ends[0].attribute_name, "enrollments");
        assert_eq!(ends[0].relation_type, RelationType::OneToMany);
    }
}
