//! Resident records as exchanged with the `/api/lansia` endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{AdlScore, LansiaId};

/// Flat projection of a resident used by the list view.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LansiaSummary {
    pub id: LansiaId,
    pub nama_lengkap: String,
    pub nik: String,
    pub jenis_kelamin: String,
    #[serde(default)]
    pub usia: Option<i32>,
    #[serde(default)]
    pub rt: Option<String>,
    #[serde(default)]
    pub rw: Option<String>,
    #[serde(default)]
    pub kelompok_usia: Option<String>,
    #[serde(default)]
    pub status_perkawinan: Option<String>,
    #[serde(default)]
    pub alamat_lengkap: Option<String>,
    #[serde(default)]
    pub koordinat: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Identity, demographic and address data of a resident.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonalData {
    pub nama_lengkap: String,
    pub nik: String,
    pub jenis_kelamin: String,
    #[serde(default)]
    pub tanggal_lahir: Option<NaiveDate>,
    #[serde(default)]
    pub alamat_lengkap: Option<String>,
    #[serde(default)]
    pub koordinat: Option<String>,
    #[serde(default)]
    pub rt: Option<String>,
    #[serde(default)]
    pub rw: Option<String>,
    #[serde(default)]
    pub status_perkawinan: Option<String>,
    #[serde(default)]
    pub agama: Option<String>,
    #[serde(default)]
    pub pendidikan_terakhir: Option<String>,
    #[serde(default)]
    pub pekerjaan_terakhir: Option<String>,
    #[serde(default)]
    pub sumber_penghasilan: Option<String>,
}

/// A value the backend stores either as one string or as a list, depending
/// on whether it came from the input form or the spreadsheet import.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn list_or_string<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(item) if item.trim().is_empty() => Vec::new(),
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }),
    )
}

fn text_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::One(text) => text,
            OneOrMany::Many(items) => items.join(", "),
        }),
    )
}

/// Health section (`kesehatan`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthData {
    #[serde(default)]
    pub kondisi_kesehatan_umum: Option<String>,
    #[serde(default)]
    pub riwayat_penyakit_kronis: Option<Vec<String>>,
    #[serde(default)]
    pub penggunaan_obat_rutin: Option<String>,
    #[serde(default, deserialize_with = "list_or_string")]
    pub alat_bantu: Option<Vec<String>>,
    #[serde(default)]
    pub aktivitas_fisik: Option<String>,
    #[serde(default)]
    pub status_gizi: Option<String>,
    #[serde(default, deserialize_with = "text_or_list")]
    pub riwayat_imunisasi: Option<String>,
}

/// Social welfare section (`kesejahteraan`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WelfareData {
    #[serde(default)]
    pub dukungan_keluarga: Option<String>,
    #[serde(default)]
    pub kondisi_rumah: Option<String>,
    #[serde(default)]
    pub kebutuhan_mendesak: Option<Vec<String>>,
    #[serde(default)]
    pub hobi_minat: Option<String>,
    #[serde(default)]
    pub kondisi_psikologis: Option<String>,
}

/// Companion / family section (`keluarga`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanionData {
    #[serde(default)]
    pub nama_pendamping: Option<String>,
    #[serde(default)]
    pub hubungan_dengan_lansia: Option<String>,
    #[serde(default)]
    pub tanggal_lahir_pendamping: Option<NaiveDate>,
    /// Computed by the backend; never sent back.
    #[serde(default, skip_serializing)]
    pub usia: Option<i32>,
    #[serde(default)]
    pub pendidikan_pendamping: Option<String>,
    #[serde(default)]
    pub ketersediaan_waktu: Option<String>,
    #[serde(default)]
    pub partisipasi_program_bkl: Option<String>,
    #[serde(default)]
    pub riwayat_partisipasi_bkl: Option<String>,
    #[serde(default)]
    pub keterlibatan_data: Option<String>,
}

/// Activities of Daily Living questionnaire. Every item scores 0..=2.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyLiving {
    #[serde(default)]
    pub bab: Option<AdlScore>,
    #[serde(default)]
    pub bak: Option<AdlScore>,
    #[serde(default)]
    pub membersihkan_diri: Option<AdlScore>,
    #[serde(default)]
    pub toilet: Option<AdlScore>,
    #[serde(default)]
    pub makan: Option<AdlScore>,
    #[serde(default)]
    pub pindah_tempat: Option<AdlScore>,
    #[serde(default)]
    pub mobilitas: Option<AdlScore>,
    #[serde(default)]
    pub berpakaian: Option<AdlScore>,
    #[serde(default)]
    pub naik_turun_tangga: Option<AdlScore>,
    #[serde(default)]
    pub mandi: Option<AdlScore>,
    /// Total as stored by the backend.
    #[serde(default)]
    pub total: Option<i32>,
}

impl DailyLiving {
    /// Item keys in questionnaire order.
    pub const ITEMS: [&'static str; 10] = [
        "bab",
        "bak",
        "membersihkan_diri",
        "toilet",
        "makan",
        "pindah_tempat",
        "mobilitas",
        "berpakaian",
        "naik_turun_tangga",
        "mandi",
    ];

    pub fn scores(&self) -> [Option<AdlScore>; 10] {
        [
            self.bab,
            self.bak,
            self.membersihkan_diri,
            self.toilet,
            self.makan,
            self.pindah_tempat,
            self.mobilitas,
            self.berpakaian,
            self.naik_turun_tangga,
            self.mandi,
        ]
    }

    /// Mutable slot for the item named `key`.
    pub fn score_mut(&mut self, key: &str) -> Option<&mut Option<AdlScore>> {
        let slot = match key {
            "bab" => &mut self.bab,
            "bak" => &mut self.bak,
            "membersihkan_diri" => &mut self.membersihkan_diri,
            "toilet" => &mut self.toilet,
            "makan" => &mut self.makan,
            "pindah_tempat" => &mut self.pindah_tempat,
            "mobilitas" => &mut self.mobilitas,
            "berpakaian" => &mut self.berpakaian,
            "naik_turun_tangga" => &mut self.naik_turun_tangga,
            "mandi" => &mut self.mandi,
            _ => return None,
        };
        Some(slot)
    }

    /// Sum of the answered items; unanswered items count as zero.
    pub fn computed_total(&self) -> u8 {
        self.scores().iter().flatten().map(|score| score.get()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scores().iter().all(Option::is_none)
    }
}

/// Full resident record returned by `GET /api/lansia/{id}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LansiaDetail {
    pub id: LansiaId,
    #[serde(flatten)]
    pub personal: PersonalData,
    #[serde(default)]
    pub usia: Option<i32>,
    #[serde(default)]
    pub kelompok_usia: Option<String>,
    #[serde(default)]
    pub kesehatan: Option<HealthData>,
    #[serde(default)]
    pub kesejahteraan: Option<WelfareData>,
    #[serde(default)]
    pub keluarga: Option<CompanionData>,
    #[serde(default)]
    pub daily_living: Option<DailyLiving>,
}

/// Body of `POST /api/lansia`: every section flattened into one object.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewLansia {
    #[serde(flatten)]
    pub personal: PersonalData,
    #[serde(flatten)]
    pub kesehatan: HealthData,
    #[serde(flatten)]
    pub kesejahteraan: WelfareData,
    #[serde(flatten)]
    pub keluarga: CompanionData,
    #[serde(flatten)]
    pub daily_living: DailyLiving,
}

/// Body of `PUT /api/lansia/{id}`: personal data at the top level, sections
/// nested. The backend rejects any top-level `null`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UpdateLansia {
    #[serde(flatten)]
    pub personal: PersonalData,
    pub kesehatan: HealthData,
    pub kesejahteraan: WelfareData,
    pub keluarga: CompanionData,
}
