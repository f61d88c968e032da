//! Characters collection (`rpg_personagens`)

use super::traits::*;
use crate::query::{AggregationKind, AggregationSpec, BoostedField, NamedRange};

const FIELDS: &[SchemaField] = &[
    SchemaField::new("nome", FieldKind::Text),
    SchemaField::new("descricao", FieldKind::Text),
    SchemaField::new("classe", FieldKind::Keyword),
    SchemaField::new("raca", FieldKind::Keyword),
    SchemaField::new("status", FieldKind::Keyword),
    SchemaField::new("nivel", FieldKind::Integer),
    SchemaField::new("experiencia", FieldKind::Integer),
    SchemaField::new("vida", FieldKind::Integer),
    SchemaField::new("mana", FieldKind::Integer),
    SchemaField::new("forca", FieldKind::Integer),
    SchemaField::new("destreza", FieldKind::Integer),
    SchemaField::new("constituicao", FieldKind::Integer),
    SchemaField::new("inteligencia", FieldKind::Integer),
    SchemaField::new("sabedoria", FieldKind::Integer),
    SchemaField::new("carisma", FieldKind::Integer),
    SchemaField::new("data_criacao", FieldKind::Date),
    SchemaField::new("ultima_atualizacao", FieldKind::Date),
];

const LEVEL_RANGES: &[NamedRange] = &[
    NamedRange::new("1-10 (Iniciante)", None, Some(11.0)),
    NamedRange::new("11-30 (Aventureiro)", Some(11.0), Some(31.0)),
    NamedRange::new("31-60 (Veterano)", Some(31.0), Some(61.0)),
    NamedRange::new("61+ (Lendário)", Some(61.0), None),
];

const SUMMARY: &[&str] = &["nome", "classe", "raca", "nivel"];

const DASHBOARD: &[AggregationSpec] = &[
    AggregationSpec::new(
        "por_classe",
        AggregationKind::Terms {
            field: "classe",
            size: 20,
        },
    ),
    AggregationSpec::new("por_raca", AggregationKind::Terms { field: "raca", size: 20 }),
    AggregationSpec::new(
        "por_status",
        AggregationKind::Terms {
            field: "status",
            size: 10,
        },
    ),
    AggregationSpec::new("nivel_stats", AggregationKind::Stats { field: "nivel" }),
    AggregationSpec::new(
        "exp_stats",
        AggregationKind::Stats {
            field: "experiencia",
        },
    ),
    AggregationSpec::new(
        "distribuicao_nivel",
        AggregationKind::Histogram {
            field: "nivel",
            interval: 10.0,
        },
    ),
    AggregationSpec::new(
        "faixas_nivel",
        AggregationKind::Range {
            field: "nivel",
            ranges: LEVEL_RANGES,
        },
    ),
    AggregationSpec::new(
        "top_experiencia",
        AggregationKind::TopHits {
            size: 5,
            sort_field: "experiencia",
            source: SUMMARY,
        },
    ),
    AggregationSpec::new(
        "total_ativos",
        AggregationKind::FilterCount {
            field: "status",
            value: "Ativo",
        },
    ),
];

const FACET_AGGS: &[AggregationSpec] = &[
    AggregationSpec::new("media_nivel", AggregationKind::Avg { field: "nivel" }),
    AggregationSpec::new(
        "media_experiencia",
        AggregationKind::Avg {
            field: "experiencia",
        },
    ),
];

pub static SCHEMA: CollectionSchema = CollectionSchema {
    collection: Collection::Characters,
    default_index: "rpg_personagens",
    fields: FIELDS,
    display_field: "nome",
    display_keyword: "nome.keyword",
    text_fields: &[
        BoostedField::new("nome", 3),
        BoostedField::new("descricao", 2),
        BoostedField::new("classe", 1),
        BoostedField::new("raca", 1),
    ],
    highlight_fields: &["nome", "descricao"],
    similarity_fields: &["nome", "descricao", "classe", "raca"],
    filters: &[
        FilterField::Exact {
            key: "classe",
            field: "classe",
        },
        FilterField::Exact {
            key: "raca",
            field: "raca",
        },
        FilterField::Exact {
            key: "status",
            field: "status",
        },
        FilterField::Range {
            min_key: "nivel_min",
            max_key: "nivel_max",
            field: "nivel",
        },
    ],
    default_sort: "nivel",
    rank_fields: &["nivel", "experiencia", "vida", "forca"],
    projection: &[
        ProjectedField::required("nome"),
        ProjectedField::required("classe"),
        ProjectedField::required("raca"),
        ProjectedField::required("nivel"),
        ProjectedField::required("status"),
        ProjectedField::optional("experiencia"),
        ProjectedField::optional("vida"),
        ProjectedField::optional("forca"),
        ProjectedField::optional("destreza"),
        ProjectedField::optional("inteligencia"),
    ],
    summary_fields: SUMMARY,
    facet: FacetSpec {
        field: "classe",
        aggregations: FACET_AGGS,
    },
    dashboard: DASHBOARD,
};
