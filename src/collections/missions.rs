//! Missions collection (`rpg_missoes`)

use super::traits::*;
use crate::query::{AggregationKind, AggregationSpec, BoostedField, NamedRange};

const FIELDS: &[SchemaField] = &[
    SchemaField::new("titulo", FieldKind::Text),
    SchemaField::new("descricao", FieldKind::Text),
    SchemaField::new("objetivo", FieldKind::Text),
    SchemaField::new("recompensa_ouro", FieldKind::Integer),
    SchemaField::new("recompensa_experiencia", FieldKind::Integer),
    SchemaField::new("nivel_minimo", FieldKind::Integer),
    SchemaField::new("nivel_maximo", FieldKind::Integer),
    SchemaField::new("dificuldade", FieldKind::Keyword),
    SchemaField::new("tipo", FieldKind::Keyword),
    SchemaField::new("localizacao", FieldKind::Keyword),
    SchemaField::new("status", FieldKind::Keyword),
    SchemaField::new("npc_ofertante", FieldKind::Keyword),
    SchemaField::new("tempo_limite_dias", FieldKind::Integer),
    SchemaField::new("numero_aceitacoes", FieldKind::Integer),
    SchemaField::new("numero_conclusoes", FieldKind::Integer),
    SchemaField::new("taxa_conclusao_pct", FieldKind::Float),
    SchemaField::new("data_criacao", FieldKind::Date),
];

const GOLD_RANGES: &[NamedRange] = &[
    NamedRange::new("0-500 (Modesta)", None, Some(500.0)),
    NamedRange::new("500-2k (Boa)", Some(500.0), Some(2000.0)),
    NamedRange::new("2k-10k (Generosa)", Some(2000.0), Some(10000.0)),
    NamedRange::new("10k+ (Épica)", Some(10000.0), None),
];

const SUMMARY: &[&str] = &["titulo", "dificuldade", "tipo", "recompensa_ouro"];

const DASHBOARD: &[AggregationSpec] = &[
    AggregationSpec::new(
        "por_dificuldade",
        AggregationKind::Terms {
            field: "dificuldade",
            size: 10,
        },
    ),
    AggregationSpec::new("por_tipo", AggregationKind::Terms { field: "tipo", size: 20 }),
    AggregationSpec::new(
        "ouro_stats",
        AggregationKind::Stats {
            field: "recompensa_ouro",
        },
    ),
    AggregationSpec::new(
        "xp_stats",
        AggregationKind::Stats {
            field: "recompensa_experiencia",
        },
    ),
    AggregationSpec::new(
        "taxa_media",
        AggregationKind::Avg {
            field: "taxa_conclusao_pct",
        },
    ),
    AggregationSpec::new(
        "distribuicao_ouro",
        AggregationKind::Histogram {
            field: "recompensa_ouro",
            interval: 1000.0,
        },
    ),
    AggregationSpec::new(
        "faixas_ouro",
        AggregationKind::Range {
            field: "recompensa_ouro",
            ranges: GOLD_RANGES,
        },
    ),
    AggregationSpec::new(
        "top_recompensas",
        AggregationKind::TopHits {
            size: 5,
            sort_field: "recompensa_ouro",
            source: SUMMARY,
        },
    ),
];

const FACET_AGGS: &[AggregationSpec] = &[
    AggregationSpec::new(
        "media_ouro",
        AggregationKind::Avg {
            field: "recompensa_ouro",
        },
    ),
    AggregationSpec::new(
        "taxa_media",
        AggregationKind::Avg {
            field: "taxa_conclusao_pct",
        },
    ),
];

pub static SCHEMA: CollectionSchema = CollectionSchema {
    collection: Collection::Missions,
    default_index: "rpg_missoes",
    fields: FIELDS,
    display_field: "titulo",
    display_keyword: "titulo.keyword",
    text_fields: &[
        BoostedField::new("titulo", 3),
        BoostedField::new("descricao", 2),
        BoostedField::new("objetivo", 1),
        BoostedField::new("tipo", 1),
    ],
    highlight_fields: &["titulo", "descricao"],
    similarity_fields: &["titulo", "descricao", "objetivo", "tipo"],
    filters: &[
        FilterField::Exact {
            key: "dificuldade",
            field: "dificuldade",
        },
        FilterField::Exact {
            key: "tipo",
            field: "tipo",
        },
        FilterField::Range {
            min_key: "nivel_min",
            max_key: "nivel_max",
            field: "nivel_minimo",
        },
        FilterField::Range {
            min_key: "ouro_min",
            max_key: "ouro_max",
            field: "recompensa_ouro",
        },
    ],
    default_sort: "recompensa_ouro",
    rank_fields: &[
        "recompensa_ouro",
        "recompensa_experiencia",
        "taxa_conclusao_pct",
    ],
    projection: &[
        ProjectedField::required("titulo"),
        ProjectedField::required("dificuldade"),
        ProjectedField::required("tipo"),
        ProjectedField::required("recompensa_ouro"),
        ProjectedField::optional("recompensa_experiencia"),
        ProjectedField::optional("nivel_minimo"),
        ProjectedField::optional("nivel_maximo"),
        ProjectedField::optional("localizacao"),
        ProjectedField::optional("objetivo"),
        ProjectedField::optional("taxa_conclusao_pct"),
    ],
    summary_fields: SUMMARY,
    facet: FacetSpec {
        field: "dificuldade",
        aggregations: FACET_AGGS,
    },
    dashboard: DASHBOARD,
};
