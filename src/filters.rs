use sea_orm::{EntityTrait, Iterable, Order, PrimaryKeyToColumn, QueryOrder, Select};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult, FieldErrors};

/// Query string accepted by the list endpoints. Numbers arrive as raw strings
/// so that bad values map onto our own errors: a bad `page` is a 404, a bad
/// `page_size` falls back to the default, a bad `user` is a field error.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    /// Comma separated field names, `-` prefix for descending.
    pub ordering: Option<String>,
    /// Only rows authored by this user id.
    pub user: Option<String>,
}

impl ListParams {
    pub fn user_id(&self) -> ApiResult<Option<i32>> {
        self.user
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<i32>().map_err(|_| {
                    ApiError::Validation(FieldErrors::single("user", "A valid integer is required."))
                })
            })
            .transpose()
    }
}

/// Parse an ordering string against the allowed `(name, column)` pairs.
/// Unknown fields are dropped.
pub fn parse_ordering<C: Copy>(ordering: &str, allowed: &[(&str, C)]) -> Vec<(C, Order)> {
    ordering
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .filter_map(|field| {
            let (name, order) = match field.strip_prefix('-') {
                Some(name) => (name, Order::Desc),
                None => (field, Order::Asc),
            };
            allowed
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, col)| (*col, order))
        })
        .collect()
}

/// Apply the requested ordering, falling back to `default` when nothing valid
/// was asked for. The primary key is always appended, in the direction of the
/// last order, so pages stay stable when the other columns tie.
pub fn apply_ordering<E: EntityTrait>(
    mut select: Select<E>,
    ordering: Option<&str>,
    allowed: &[(&str, E::Column)],
    default: (E::Column, Order),
) -> Select<E> {
    let mut orders = ordering
        .map(|o| parse_ordering(o, allowed))
        .unwrap_or_default();
    if orders.is_empty() {
        orders.push(default);
    }
    let tie_break = orders.last().map(|(_, o)| o.clone()).unwrap_or(Order::Asc);
    for (col, order) in orders {
        select = select.order_by(col, order);
    }
    for key in E::PrimaryKey::iter() {
        select = select.order_by(key.into_column(), tie_break.clone());
    }
    select
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::feed;

    const FIELDS: &[(&str, feed::Column)] = &[
        ("id", feed::Column::Id),
        ("created_at", feed::Column::CreatedAt),
    ];

    #[test]
    fn test_parse_ordering() {
        let parsed = parse_ordering("-created_at, id", FIELDS);
        assert_eq!(parsed.len(), 2);
        assert!(matches!(parsed[0], (feed::Column::CreatedAt, Order::Desc)));
        assert!(matches!(parsed[1], (feed::Column::Id, Order::Asc)));
    }

    #[test]
    fn test_user_id_parsing() {
        let params = ListParams {
            user: Some(" 7 ".into()),
            ..Default::default()
        };
        assert_eq!(params.user_id().unwrap(), Some(7));
        assert_eq!(ListParams::default().user_id().unwrap(), None);

        let params = ListParams {
            user: Some("abc".into()),
            ..Default::default()
        };
        match params.user_id() {
            Err(ApiError::Validation(errors)) => assert!(errors.get("user").is_some()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_apply_ordering_breaks_ties_by_id() {
        use sea_orm::{DbBackend, QueryTrait};

        let sql = |ordering: Option<&str>| {
            apply_ordering(
                feed::Entity::find(),
                ordering,
                FIELDS,
                (feed::Column::CreatedAt, Order::Asc),
            )
            .build(DbBackend::Sqlite)
            .to_string()
        };

        assert!(sql(None).ends_with(r#"ORDER BY "feeds"."created_at" ASC, "feeds"."id" ASC"#));
        assert!(sql(Some("-created_at"))
            .ends_with(r#"ORDER BY "feeds"."created_at" DESC, "feeds"."id" DESC"#));
    }

    #[test]
    fn test_parse_ordering_ignores_unknown_fields() {
        assert!(parse_ordering("password,-secret,,", FIELDS).is_empty());
        assert_eq!(parse_ordering("nope,-id", FIELDS).len(), 1);
    }
}
