// Selection-set derivation
//
// Selections are derived from the schema's declared field sets, never from
// ad hoc lists: scalar fields become leaves, entity-valued fields recurse into
// the nested type's own declared fields. Relations (`User.controllers`,
// `Controller.zones`) are only selected when a call site asks for them.

use crate::error::Error;
use crate::graphql::Selection;
use crate::schema::Schema;

/// The full default selection for `type_name`, in field declaration order.
pub fn selectors_for(schema: &Schema, type_name: &str) -> Result<Vec<Selection>, Error> {
    let def = schema
        .type_def(type_name)
        .ok_or_else(|| Error::Schema(format!("unknown type {type_name}")))?;

    def.fields
        .iter()
        .map(|field| match field.kind.target() {
            None => Ok(Selection::leaf(field.name)),
            Some(target) => Ok(Selection::nested(field.name, selectors_for(schema, target)?)),
        })
        .collect()
}

/// Select relation `field` of `parent`, with the target type's default selection.
pub fn relation(schema: &Schema, parent: &str, field: &str) -> Result<Selection, Error> {
    let def = schema
        .type_def(parent)
        .ok_or_else(|| Error::Schema(format!("unknown type {parent}")))?;
    let rel = def
        .relations
        .iter()
        .find(|r| r.name == field)
        .ok_or_else(|| Error::Schema(format!("{parent} has no relation {field}")))?;
    let target = rel
        .kind
        .target()
        .ok_or_else(|| Error::Schema(format!("{parent}.{field} is not an entity")))?;

    Ok(Selection::nested(rel.name, selectors_for(schema, target)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{
        Controller, ControllerHardware, DateTime, Decode, StatusCodeAndSummary, User, Zone,
        ZoneSuspension,
    };

    fn names(selection: &[Selection]) -> Vec<&'static str> {
        selection.iter().map(|s| s.name).collect()
    }

    #[test]
    fn scalar_fields_are_leaves_in_declaration_order() {
        let schema = Schema::build().unwrap();
        let sel = selectors_for(&schema, User::TYPE_NAME).unwrap();
        assert_eq!(names(&sel), vec!["id", "customerId", "name", "email"]);
        assert!(sel.iter().all(|s| s.children.is_empty()));
    }

    #[test]
    fn nested_entities_are_expanded() {
        let schema = Schema::build().unwrap();
        let sel = selectors_for(&schema, Zone::TYPE_NAME).unwrap();
        let suspensions = sel.iter().find(|s| s.name == "suspensions").unwrap();
        assert_eq!(names(&suspensions.children), vec!["id", "zoneId", "until"]);
        let until = &suspensions.children[2];
        assert_eq!(names(&until.children), vec!["value", "timestamp"]);
    }

    #[test]
    fn relations_are_not_selected_by_default() {
        let schema = Schema::build().unwrap();
        let user = selectors_for(&schema, User::TYPE_NAME).unwrap();
        assert!(!names(&user).contains(&"controllers"));
        let controller = selectors_for(&schema, Controller::TYPE_NAME).unwrap();
        assert!(!names(&controller).contains(&"zones"));
    }

    #[test]
    fn selection_is_deterministic_and_within_declared_fields() {
        let schema = Schema::build().unwrap();
        for type_name in [
            User::TYPE_NAME,
            Controller::TYPE_NAME,
            ControllerHardware::TYPE_NAME,
            Zone::TYPE_NAME,
            ZoneSuspension::TYPE_NAME,
            StatusCodeAndSummary::TYPE_NAME,
            DateTime::TYPE_NAME,
        ] {
            let first = selectors_for(&schema, type_name).unwrap();
            let second = selectors_for(&schema, type_name).unwrap();
            assert_eq!(first, second);

            let declared = schema.type_def(type_name).unwrap();
            for sel in &first {
                assert!(
                    declared.fields.iter().any(|f| f.name == sel.name),
                    "{type_name}.{} is not declared",
                    sel.name
                );
            }
            schema.validate_selection(type_name, &first).unwrap();
        }
    }

    #[test]
    fn relation_selects_target_fields() {
        let schema = Schema::build().unwrap();
        let sel = relation(&schema, User::TYPE_NAME, "controllers").unwrap();
        assert_eq!(sel.name, "controllers");
        assert_eq!(
            sel.children,
            selectors_for(&schema, Controller::TYPE_NAME).unwrap()
        );
    }

    #[test]
    fn unknown_relation_is_a_schema_error() {
        let schema = Schema::build().unwrap();
        let err = relation(&schema, Zone::TYPE_NAME, "controllers").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        let err = selectors_for(&schema, "Sprinkler").unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
