//! Per-operation query construction

use super::dsl::{Clause, Projection, QueryRequest, SortSpec, MAX_RESULT_SIZE};
use super::filters::FilterCriteria;
use super::Operation;
use crate::collections::CollectionSchema;
use crate::error::{Error, Result};

const SEARCH_SIZE: u32 = 20;
const FILTER_SIZE: u32 = 50;
const AUTOCOMPLETE_SIZE: u32 = 10;
const SIMILAR_SIZE: u32 = 10;
const TOP_SIZE: u32 = 10;
const FACET_SIZE: u32 = 50;

/// Shorter prefixes match too much of the index to be useful
pub const MIN_PREFIX_CHARS: usize = 2;
const PREFIX_MAX_EXPANSIONS: u32 = 10;

const MLT_MIN_TERM_FREQ: u32 = 1;
const MLT_MIN_DOC_FREQ: u32 = 1;
const MLT_MAX_QUERY_TERMS: u32 = 12;

/// Builds engine requests for one collection
pub struct QueryBuilder<'a> {
    schema: &'static CollectionSchema,
    /// Index name, needed to reference seed documents
    index: &'a str,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(schema: &'static CollectionSchema, index: &'a str) -> Self {
        Self { schema, index }
    }

    fn request(&self, operation: Operation, query: Clause, size: u32) -> QueryRequest {
        QueryRequest::new(operation, self.schema.collection, query, size)
    }

    fn text_clause(&self, text: &str) -> Clause {
        Clause::MultiMatch {
            query: text.to_string(),
            fields: self.schema.text_fields.to_vec(),
        }
    }

    /// Weighted fuzzy full-text search with highlighting
    pub fn search_text(&self, term: &str) -> Result<QueryRequest> {
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::validation("search term must not be empty"));
        }

        Ok(self
            .request(Operation::SearchText, self.text_clause(term), SEARCH_SIZE)
            .highlighting(self.schema.highlight_fields)
            .ranked(true))
    }

    /// Filter-only listing sorted by the collection's default key
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<QueryRequest> {
        if criteria.is_empty() {
            return Err(Error::validation(format!(
                "at least one filter is required; available filters: {}",
                self.schema.filter_keys().join(", ")
            )));
        }

        Ok(self
            .request(
                Operation::Filter,
                Clause::filter(criteria.to_clauses()),
                FILTER_SIZE,
            )
            .sorted_by(SortSpec::desc(self.schema.default_sort)))
    }

    /// Prefix suggestions on the display field
    pub fn autocomplete(&self, prefix: &str) -> Result<QueryRequest> {
        let prefix = prefix.trim();
        if prefix.chars().count() < MIN_PREFIX_CHARS {
            return Err(Error::validation(format!(
                "prefix must have at least {} characters",
                MIN_PREFIX_CHARS
            )));
        }

        let query = Clause::Bool {
            must: vec![],
            filter: vec![],
            should: vec![
                Clause::PhrasePrefix {
                    field: self.schema.display_field,
                    query: prefix.to_string(),
                    max_expansions: PREFIX_MAX_EXPANSIONS,
                },
                Clause::Wildcard {
                    field: self.schema.display_keyword,
                    pattern: format!("*{}*", escape_wildcard(prefix)),
                },
            ],
        };

        Ok(self
            .request(Operation::Autocomplete, query, AUTOCOMPLETE_SIZE)
            .with_source(self.schema.summary_fields)
            .projection(Projection::Summary))
    }

    /// More-like-this against a seed document the caller has verified exists
    pub fn similar(&self, id: &str) -> Result<QueryRequest> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::validation("document id must not be empty"));
        }

        let query = Clause::MoreLikeThis {
            fields: self.schema.similarity_fields.to_vec(),
            index: self.index.to_string(),
            id: id.to_string(),
            min_term_freq: MLT_MIN_TERM_FREQ,
            min_doc_freq: MLT_MIN_DOC_FREQ,
            max_query_terms: MLT_MAX_QUERY_TERMS,
        };

        Ok(self
            .request(Operation::Similar, query, SIMILAR_SIZE)
            .ranked(true))
    }

    /// Free text ranks results, filters only exclude
    pub fn advanced_search(
        &self,
        text: Option<&str>,
        criteria: &FilterCriteria,
        size: Option<u32>,
    ) -> Result<QueryRequest> {
        let text = text.map(str::trim).filter(|t| !t.is_empty());
        if text.is_none() && criteria.is_empty() {
            return Err(Error::validation(
                "advanced search needs free text, filters, or both",
            ));
        }

        let size = size.unwrap_or(SEARCH_SIZE);
        if size == 0 {
            return Err(Error::validation(format!(
                "size must be between 1 and {}",
                MAX_RESULT_SIZE
            )));
        }

        let query = Clause::Bool {
            must: text.map(|t| self.text_clause(t)).into_iter().collect(),
            filter: criteria.to_clauses(),
            should: vec![],
        };

        Ok(self
            .request(Operation::AdvancedSearch, query, size)
            .ranked(text.is_some()))
    }

    /// Aggregations only, no hits
    pub fn dashboard(&self) -> QueryRequest {
        self.request(Operation::Dashboard, Clause::MatchAll, 0)
            .with_aggregations(self.schema.dashboard)
    }

    /// Whole collection ranked by one numeric field
    pub fn top(&self, sort_by: Option<&str>) -> Result<QueryRequest> {
        let field = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            None => self.schema.default_sort,
            Some(requested) => {
                let requested = requested.to_lowercase();
                *self
                    .schema
                    .rank_fields
                    .iter()
                    .find(|f| **f == requested)
                    .ok_or_else(|| {
                        Error::validation(format!(
                            "cannot rank {} by '{}'; expected one of: {}",
                            self.schema.collection,
                            requested,
                            self.schema.rank_fields.join(", ")
                        ))
                    })?
            }
        };

        Ok(self
            .request(Operation::Top, Clause::MatchAll, TOP_SIZE)
            .sorted_by(SortSpec::desc(field)))
    }

    /// Exact facet value listing with summary averages
    pub fn facet(&self, value: &str) -> Result<QueryRequest> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::validation(format!(
                "a {} value is required",
                self.schema.facet.field
            )));
        }

        let query = Clause::Term {
            field: self.schema.facet.field,
            value: value.to_string(),
        };

        Ok(self
            .request(Operation::Facet, query, FACET_SIZE)
            .sorted_by(SortSpec::desc(self.schema.default_sort))
            .with_aggregations(self.schema.facet.aggregations))
    }
}

fn escape_wildcard(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::Collection;
    use serde_json::json;

    fn builder(collection: Collection) -> QueryBuilder<'static> {
        let schema = collection.schema();
        QueryBuilder::new(schema, schema.default_index)
    }

    fn filter_clauses(request: &QueryRequest) -> &[Clause] {
        match &request.query {
            Clause::Bool { must, filter, should } => {
                assert!(must.is_empty() && should.is_empty());
                filter
            }
            other => panic!("expected bool query, got {:?}", other),
        }
    }

    #[test]
    fn test_search_text_boosts_and_highlights() {
        let request = builder(Collection::Items).search_text(" espada ").unwrap();
        let body = request.to_body();

        assert_eq!(body["query"]["multi_match"]["query"], "espada");
        assert_eq!(
            body["query"]["multi_match"]["fields"],
            json!(["nome^3", "descricao^2", "tags"])
        );
        assert_eq!(body["query"]["multi_match"]["fuzziness"], "AUTO");
        assert_eq!(body["query"]["multi_match"]["operator"], "or");
        assert!(body["highlight"]["fields"]["nome"].is_object());
        assert_eq!(body["size"], 20);
        assert!(request.ranked);
    }

    #[test]
    fn test_search_text_rejects_blank_term() {
        for collection in Collection::ALL {
            let err = builder(collection).search_text("   ").unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[test]
    fn test_each_filter_key_yields_exactly_one_clause() {
        for collection in Collection::ALL {
            let schema = collection.schema();
            for key in schema.filter_keys() {
                let value = if key.ends_with("_min") || key.ends_with("_max") {
                    json!(10)
                } else {
                    json!("x")
                };
                let criteria = FilterCriteria::parse(schema, [(key, value)]).unwrap();
                let request = builder(collection).filter(&criteria).unwrap();
                let clauses = filter_clauses(&request);

                assert_eq!(clauses.len(), 1, "{} / {}", collection, key);
                let field = schema.filter_for_key(key).unwrap().field();
                let touches_field = match &clauses[0] {
                    Clause::Term { field: f, .. } | Clause::Range { field: f, .. } => *f == field,
                    _ => false,
                };
                assert!(touches_field, "{} / {}", collection, key);
            }
        }
    }

    #[test]
    fn test_filter_without_criteria_is_rejected() {
        for collection in Collection::ALL {
            let err = builder(collection)
                .filter(&FilterCriteria::default())
                .unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
    }

    #[test]
    fn test_filter_two_exact_keys() {
        let criteria = FilterCriteria::parse(
            Collection::Items.schema(),
            [("tipo", json!("Arma")), ("raridade", json!("Lendário"))],
        )
        .unwrap();
        let request = builder(Collection::Items).filter(&criteria).unwrap();
        let clauses = filter_clauses(&request);

        assert_eq!(clauses.len(), 2);
        assert!(clauses.iter().all(|c| matches!(c, Clause::Term { .. })));
        assert_eq!(request.sort, vec![SortSpec::desc("valor")]);
        assert!(!request.ranked);

        let body = request.to_body();
        assert_eq!(body["sort"][0]["valor"], "desc");
        assert_eq!(body["query"]["bool"]["filter"][1]["term"]["raridade"], "Lendário");
    }

    #[test]
    fn test_filter_lower_bound_only() {
        let criteria =
            FilterCriteria::parse(Collection::Items.schema(), [("valor_min", json!("1000"))])
                .unwrap();
        let request = builder(Collection::Items).filter(&criteria).unwrap();
        let body = request.to_body();
        let range = &body["query"]["bool"]["filter"][0]["range"]["valor"];

        assert_eq!(range["gte"], 1000);
        assert!(range.get("lte").is_none());
    }

    #[test]
    fn test_default_sort_per_collection() {
        let cases = [
            (Collection::Characters, "classe", "nivel"),
            (Collection::Missions, "dificuldade", "recompensa_ouro"),
        ];
        for (collection, key, sort) in cases {
            let criteria =
                FilterCriteria::parse(collection.schema(), [(key, json!("x"))]).unwrap();
            let request = builder(collection).filter(&criteria).unwrap();
            assert_eq!(request.sort, vec![SortSpec::desc(sort)]);
        }
    }

    #[test]
    fn test_autocomplete_prefix_length() {
        let err = builder(Collection::Items).autocomplete("e").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // counted in characters, not bytes
        let err = builder(Collection::Items).autocomplete("é").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(builder(Collection::Items).autocomplete("es").is_ok());
    }

    #[test]
    fn test_autocomplete_clauses() {
        let request = builder(Collection::Missions).autocomplete("dra*").unwrap();
        let body = request.to_body();
        let should = &body["query"]["bool"]["should"];

        assert_eq!(should[0]["match_phrase_prefix"]["titulo"]["query"], "dra*");
        assert_eq!(
            should[0]["match_phrase_prefix"]["titulo"]["max_expansions"],
            10
        );
        assert_eq!(should[1]["wildcard"]["titulo.keyword"]["value"], "*dra\\**");
        assert_eq!(
            should[1]["wildcard"]["titulo.keyword"]["case_insensitive"],
            true
        );
        assert_eq!(
            body["_source"],
            json!(["titulo", "dificuldade", "tipo", "recompensa_ouro"])
        );
        assert_eq!(request.projection, Projection::Summary);
        assert!(!request.ranked);
    }

    #[test]
    fn test_similar_references_seed() {
        let request = builder(Collection::Items).similar("42").unwrap();
        let mlt = &request.to_body()["query"]["more_like_this"];

        assert_eq!(mlt["like"], json!([{ "_index": "rpg_itens", "_id": "42" }]));
        assert_eq!(mlt["fields"], json!(["nome", "descricao", "tags", "tipo"]));
        assert_eq!(mlt["min_term_freq"], 1);
        assert_eq!(mlt["min_doc_freq"], 1);
        assert_eq!(mlt["max_query_terms"], 12);
    }

    #[test]
    fn test_similar_trims_id() {
        let request = builder(Collection::Items).similar("  42 ").unwrap();
        let like = &request.to_body()["query"]["more_like_this"]["like"];

        assert_eq!(like, &json!([{ "_index": "rpg_itens", "_id": "42" }]));
    }

    #[test]
    fn test_advanced_separates_must_and_filter() {
        let criteria = FilterCriteria::parse(
            Collection::Items.schema(),
            [("tipo", json!("Arma")), ("valor_max", json!(500))],
        )
        .unwrap();
        let request = builder(Collection::Items)
            .advanced_search(Some("fogo"), &criteria, None)
            .unwrap();

        match &request.query {
            Clause::Bool { must, filter, .. } => {
                assert_eq!(must.len(), 1);
                assert!(matches!(must[0], Clause::MultiMatch { .. }));
                assert_eq!(filter.len(), 2);
                assert!(!filter.iter().any(|c| matches!(c, Clause::MultiMatch { .. })));
            }
            other => panic!("expected bool query, got {:?}", other),
        }
        assert!(request.ranked);
        assert_eq!(request.size, 20);
    }

    #[test]
    fn test_advanced_text_clause_ignores_filters() {
        let b = builder(Collection::Items);
        let criteria =
            FilterCriteria::parse(Collection::Items.schema(), [("tipo", json!("Arma"))]).unwrap();

        let text_only = b
            .advanced_search(Some("fogo"), &FilterCriteria::default(), None)
            .unwrap();
        let combined = b.advanced_search(Some("fogo"), &criteria, None).unwrap();

        let must = |r: &QueryRequest| r.to_body()["query"]["bool"]["must"].clone();
        assert_eq!(must(&text_only), must(&combined));
    }

    #[test]
    fn test_advanced_validation() {
        let b = builder(Collection::Characters);
        let none = FilterCriteria::default();

        assert!(matches!(
            b.advanced_search(Some("  "), &none, None).unwrap_err(),
            Error::Validation(_)
        ));
        assert!(matches!(
            b.advanced_search(Some("mago"), &none, Some(0)).unwrap_err(),
            Error::Validation(_)
        ));

        let capped = b.advanced_search(Some("mago"), &none, Some(1000)).unwrap();
        assert_eq!(capped.size, MAX_RESULT_SIZE);
    }

    #[test]
    fn test_advanced_filters_only_is_unranked() {
        let criteria =
            FilterCriteria::parse(Collection::Characters.schema(), [("raca", json!("Elfo"))])
                .unwrap();
        let request = builder(Collection::Characters)
            .advanced_search(None, &criteria, Some(5))
            .unwrap();

        assert!(!request.ranked);
        assert!(request.to_body()["query"]["bool"].get("must").is_none());
    }

    #[test]
    fn test_dashboard_requests_no_hits() {
        for collection in Collection::ALL {
            let request = builder(collection).dashboard();
            let body = request.to_body();

            assert_eq!(body["size"], 0);
            let aggs = body["aggs"].as_object().unwrap();
            assert_eq!(aggs.len(), collection.schema().dashboard.len());
        }
    }

    #[test]
    fn test_top_ranking_fields() {
        let b = builder(Collection::Characters);

        let request = b.top(None).unwrap();
        assert_eq!(request.sort, vec![SortSpec::desc("nivel")]);
        assert_eq!(request.query, Clause::MatchAll);

        let request = b.top(Some("Experiencia")).unwrap();
        assert_eq!(request.sort, vec![SortSpec::desc("experiencia")]);

        assert!(matches!(
            b.top(Some("carisma")).unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_facet_listing() {
        let request = builder(Collection::Missions).facet("Difícil").unwrap();
        let body = request.to_body();

        assert_eq!(body["query"]["term"]["dificuldade"], "Difícil");
        assert_eq!(body["sort"][0]["recompensa_ouro"], "desc");
        assert_eq!(body["aggs"]["taxa_media"]["avg"]["field"], "taxa_conclusao_pct");
        assert!(matches!(
            builder(Collection::Missions).facet("").unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_size_never_exceeds_cap() {
        let b = builder(Collection::Items);
        let criteria =
            FilterCriteria::parse(Collection::Items.schema(), [("tipo", json!("Arma"))]).unwrap();
        let requests = [
            b.search_text("espada").unwrap(),
            b.filter(&criteria).unwrap(),
            b.autocomplete("es").unwrap(),
            b.similar("1").unwrap(),
            b.dashboard(),
            b.top(None).unwrap(),
            b.facet("Raro").unwrap(),
        ];
        for request in requests {
            assert!(request.to_body()["size"].as_u64().unwrap() <= MAX_RESULT_SIZE as u64);
        }
    }

    #[test]
    fn test_escape_wildcard() {
        assert_eq!(escape_wildcard(r"a*b?c\"), r"a\*b\?c\\");
        assert_eq!(escape_wildcard("plain"), "plain");
    }
}
