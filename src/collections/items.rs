//! Items collection (`rpg_itens`)

use super::traits::*;
use crate::query::{AggregationKind, AggregationSpec, BoostedField, NamedRange};

const FIELDS: &[SchemaField] = &[
    SchemaField::new("nome", FieldKind::Text),
    SchemaField::new("descricao", FieldKind::Text),
    SchemaField::new("tipo", FieldKind::Keyword),
    SchemaField::new("raridade", FieldKind::Keyword),
    SchemaField::new("valor", FieldKind::Integer),
    SchemaField::new("peso", FieldKind::Integer),
    SchemaField::new("nivel_requerido", FieldKind::Integer),
    SchemaField::new("tags", FieldKind::Keyword),
    SchemaField::new("data_criacao", FieldKind::Date),
];

const VALUE_RANGES: &[NamedRange] = &[
    NamedRange::new("0-100 (Muito Barato)", None, Some(100.0)),
    NamedRange::new("100-1000 (Barato)", Some(100.0), Some(1000.0)),
    NamedRange::new("1k-10k (Médio)", Some(1000.0), Some(10000.0)),
    NamedRange::new("10k-100k (Caro)", Some(10000.0), Some(100000.0)),
    NamedRange::new("100k+ (Muito Caro)", Some(100000.0), None),
];

const SUMMARY: &[&str] = &["nome", "tipo", "raridade", "valor"];

const DASHBOARD: &[AggregationSpec] = &[
    AggregationSpec::new("por_tipo", AggregationKind::Terms { field: "tipo", size: 10 }),
    AggregationSpec::new(
        "por_raridade",
        AggregationKind::Terms {
            field: "raridade",
            size: 10,
        },
    ),
    AggregationSpec::new(
        "distribuicao_valor",
        AggregationKind::Histogram {
            field: "valor",
            interval: 10000.0,
        },
    ),
    AggregationSpec::new(
        "ranges_valor",
        AggregationKind::Range {
            field: "valor",
            ranges: VALUE_RANGES,
        },
    ),
    AggregationSpec::new("estatisticas_valor", AggregationKind::Stats { field: "valor" }),
    AggregationSpec::new(
        "estatisticas_nivel",
        AggregationKind::Stats {
            field: "nivel_requerido",
        },
    ),
    AggregationSpec::new(
        "top_itens_caros",
        AggregationKind::TopHits {
            size: 5,
            sort_field: "valor",
            source: SUMMARY,
        },
    ),
];

const FACET_AGGS: &[AggregationSpec] = &[AggregationSpec::new(
    "media_valor",
    AggregationKind::Avg { field: "valor" },
)];

pub static SCHEMA: CollectionSchema = CollectionSchema {
    collection: Collection::Items,
    default_index: "rpg_itens",
    fields: FIELDS,
    display_field: "nome",
    display_keyword: "nome.keyword",
    text_fields: &[
        BoostedField::new("nome", 3),
        BoostedField::new("descricao", 2),
        BoostedField::new("tags", 1),
    ],
    highlight_fields: &["nome", "descricao"],
    similarity_fields: &["nome", "descricao", "tags", "tipo"],
    filters: &[
        FilterField::Exact {
            key: "tipo",
            field: "tipo",
        },
        FilterField::Exact {
            key: "raridade",
            field: "raridade",
        },
        FilterField::Range {
            min_key: "valor_min",
            max_key: "valor_max",
            field: "valor",
        },
        FilterField::Range {
            min_key: "nivel_min",
            max_key: "nivel_max",
            field: "nivel_requerido",
        },
    ],
    default_sort: "valor",
    rank_fields: &["valor", "nivel_requerido", "peso"],
    projection: &[
        ProjectedField::required("nome"),
        ProjectedField::required("tipo"),
        ProjectedField::required("raridade"),
        ProjectedField::required("valor"),
        ProjectedField::optional("descricao"),
        ProjectedField::optional("nivel_requerido"),
        ProjectedField::optional("peso"),
    ],
    summary_fields: SUMMARY,
    facet: FacetSpec {
        field: "raridade",
        aggregations: FACET_AGGS,
    },
    dashboard: DASHBOARD,
};
