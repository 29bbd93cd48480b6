//! Manual entry and edit form for a resident record.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::lansia::{
    CompanionData, DailyLiving, HealthData, LansiaDetail, NewLansia, PersonalData, UpdateLansia,
    WelfareData,
};
use crate::domain::types::{AdlScore, FullName, Gender, Nik};
use crate::forms::FormError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text-bound state of the input and edit screens.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LansiaForm {
    // Personal data
    #[validate(length(min = 1, message = "Nama lengkap wajib diisi"))]
    pub nama_lengkap: String,
    #[validate(length(min = 1, message = "NIK wajib diisi"))]
    pub nik: String,
    #[validate(length(min = 1, message = "Jenis kelamin wajib diisi"))]
    pub jenis_kelamin: String,
    pub tanggal_lahir: String,
    pub alamat_lengkap: String,
    pub koordinat: String,
    pub rt: String,
    pub rw: String,
    pub status_perkawinan: String,
    pub agama: String,
    pub pendidikan_terakhir: String,
    pub pekerjaan_terakhir: String,
    pub sumber_penghasilan: String,

    // Health
    pub kondisi_kesehatan_umum: String,
    pub riwayat_penyakit_kronis: Vec<String>,
    pub penggunaan_obat_rutin: String,
    pub alat_bantu: Vec<String>,
    pub aktivitas_fisik: String,
    pub status_gizi: String,
    pub riwayat_imunisasi: String,

    // Social welfare
    pub dukungan_keluarga: String,
    pub kondisi_rumah: String,
    pub kebutuhan_mendesak: Vec<String>,
    pub hobi_minat: String,
    pub kondisi_psikologis: String,

    // Companion
    pub nama_pendamping: String,
    pub hubungan_dengan_lansia: String,
    pub tanggal_lahir_pendamping: String,
    pub pendidikan_pendamping: String,
    pub ketersediaan_waktu: String,
    pub partisipasi_program_bkl: String,
    pub riwayat_partisipasi_bkl: String,
    pub keterlibatan_data: String,

    // ADL
    pub daily_living: DailyLiving,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_list(values: &[String]) -> Option<Vec<String>> {
    let cleaned: Vec<String> = values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn optional_date(value: &str, field: &'static str) -> Result<Option<NaiveDate>, FormError> {
    match optional(value) {
        Some(raw) => NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| FormError::InvalidDate(field)),
        None => Ok(None),
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date_text(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

impl LansiaForm {
    /// Pre-fills the edit form from a loaded record.
    pub fn from_detail(detail: &LansiaDetail) -> Self {
        let personal = &detail.personal;
        let health = detail.kesehatan.clone().unwrap_or_default();
        let welfare = detail.kesejahteraan.clone().unwrap_or_default();
        let companion = detail.keluarga.clone().unwrap_or_default();

        Self {
            nama_lengkap: personal.nama_lengkap.clone(),
            nik: personal.nik.clone(),
            jenis_kelamin: personal.jenis_kelamin.clone(),
            tanggal_lahir: date_text(personal.tanggal_lahir),
            alamat_lengkap: text(&personal.alamat_lengkap),
            koordinat: text(&personal.koordinat),
            rt: text(&personal.rt),
            rw: text(&personal.rw),
            status_perkawinan: text(&personal.status_perkawinan),
            agama: text(&personal.agama),
            pendidikan_terakhir: text(&personal.pendidikan_terakhir),
            pekerjaan_terakhir: text(&personal.pekerjaan_terakhir),
            sumber_penghasilan: text(&personal.sumber_penghasilan),
            kondisi_kesehatan_umum: text(&health.kondisi_kesehatan_umum),
            riwayat_penyakit_kronis: health.riwayat_penyakit_kronis.unwrap_or_default(),
            penggunaan_obat_rutin: text(&health.penggunaan_obat_rutin),
            alat_bantu: health.alat_bantu.unwrap_or_default(),
            aktivitas_fisik: text(&health.aktivitas_fisik),
            status_gizi: text(&health.status_gizi),
            riwayat_imunisasi: text(&health.riwayat_imunisasi),
            dukungan_keluarga: text(&welfare.dukungan_keluarga),
            kondisi_rumah: text(&welfare.kondisi_rumah),
            kebutuhan_mendesak: welfare.kebutuhan_mendesak.unwrap_or_default(),
            hobi_minat: text(&welfare.hobi_minat),
            kondisi_psikologis: text(&welfare.kondisi_psikologis),
            nama_pendamping: text(&companion.nama_pendamping),
            hubungan_dengan_lansia: text(&companion.hubungan_dengan_lansia),
            tanggal_lahir_pendamping: date_text(companion.tanggal_lahir_pendamping),
            pendidikan_pendamping: text(&companion.pendidikan_pendamping),
            ketersediaan_waktu: text(&companion.ketersediaan_waktu),
            partisipasi_program_bkl: text(&companion.partisipasi_program_bkl),
            riwayat_partisipasi_bkl: text(&companion.riwayat_partisipasi_bkl),
            keterlibatan_data: text(&companion.keterlibatan_data),
            daily_living: detail.daily_living.clone().unwrap_or_default(),
        }
    }

    fn text_field_mut(&mut self, key: &str) -> Option<&mut String> {
        let field = match key {
            "nama_lengkap" => &mut self.nama_lengkap,
            "nik" => &mut self.nik,
            "jenis_kelamin" => &mut self.jenis_kelamin,
            "tanggal_lahir" => &mut self.tanggal_lahir,
            "alamat_lengkap" => &mut self.alamat_lengkap,
            "koordinat" => &mut self.koordinat,
            "rt" => &mut self.rt,
            "rw" => &mut self.rw,
            "status_perkawinan" => &mut self.status_perkawinan,
            "agama" => &mut self.agama,
            "pendidikan_terakhir" => &mut self.pendidikan_terakhir,
            "pekerjaan_terakhir" => &mut self.pekerjaan_terakhir,
            "sumber_penghasilan" => &mut self.sumber_penghasilan,
            "kondisi_kesehatan_umum" => &mut self.kondisi_kesehatan_umum,
            "penggunaan_obat_rutin" => &mut self.penggunaan_obat_rutin,
            "aktivitas_fisik" => &mut self.aktivitas_fisik,
            "status_gizi" => &mut self.status_gizi,
            "riwayat_imunisasi" => &mut self.riwayat_imunisasi,
            "dukungan_keluarga" => &mut self.dukungan_keluarga,
            "kondisi_rumah" => &mut self.kondisi_rumah,
            "hobi_minat" => &mut self.hobi_minat,
            "kondisi_psikologis" => &mut self.kondisi_psikologis,
            "nama_pendamping" => &mut self.nama_pendamping,
            "hubungan_dengan_lansia" => &mut self.hubungan_dengan_lansia,
            "tanggal_lahir_pendamping" => &mut self.tanggal_lahir_pendamping,
            "pendidikan_pendamping" => &mut self.pendidikan_pendamping,
            "ketersediaan_waktu" => &mut self.ketersediaan_waktu,
            "partisipasi_program_bkl" => &mut self.partisipasi_program_bkl,
            "riwayat_partisipasi_bkl" => &mut self.riwayat_partisipasi_bkl,
            "keterlibatan_data" => &mut self.keterlibatan_data,
            _ => return None,
        };
        Some(field)
    }

    fn list_field_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        let field = match key {
            "riwayat_penyakit_kronis" => &mut self.riwayat_penyakit_kronis,
            "alat_bantu" => &mut self.alat_bantu,
            "kebutuhan_mendesak" => &mut self.kebutuhan_mendesak,
            _ => return None,
        };
        Some(field)
    }

    /// Binds a single field from its textual representation. List fields
    /// take comma-separated values; ADL items take `0`, `1`, `2` or an empty
    /// value to clear the answer.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        if let Some(field) = self.text_field_mut(key) {
            *field = value.trim().to_string();
            return Ok(());
        }

        if let Some(field) = self.list_field_mut(key) {
            *field = value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            return Ok(());
        }

        if let Some(slot) = self.daily_living.score_mut(key) {
            let raw = value.trim();
            *slot = if raw.is_empty() {
                None
            } else {
                let score = raw
                    .parse::<u8>()
                    .ok()
                    .and_then(|score| AdlScore::new(score).ok())
                    .ok_or_else(|| FormError::InvalidAdlScore(key.to_string()))?;
                Some(score)
            };
            return Ok(());
        }

        Err(FormError::UnknownField(key.to_string()))
    }

    fn checked_identity(&self) -> Result<(FullName, Nik, Gender), FormError> {
        self.validate()?;
        let name = FullName::new(self.nama_lengkap.as_str()).map_err(|_| FormError::InvalidName)?;
        let nik = Nik::new(self.nik.as_str()).map_err(|_| FormError::InvalidNik)?;
        let gender = Gender::new(self.jenis_kelamin.as_str())
            .map_err(|_| FormError::MissingField("jenis_kelamin"))?;
        Ok((name, nik, gender))
    }

    fn health(&self) -> HealthData {
        HealthData {
            kondisi_kesehatan_umum: optional(&self.kondisi_kesehatan_umum),
            riwayat_penyakit_kronis: optional_list(&self.riwayat_penyakit_kronis),
            penggunaan_obat_rutin: optional(&self.penggunaan_obat_rutin),
            alat_bantu: optional_list(&self.alat_bantu),
            aktivitas_fisik: optional(&self.aktivitas_fisik),
            status_gizi: optional(&self.status_gizi),
            riwayat_imunisasi: optional(&self.riwayat_imunisasi),
        }
    }

    fn welfare(&self) -> WelfareData {
        WelfareData {
            dukungan_keluarga: optional(&self.dukungan_keluarga),
            kondisi_rumah: optional(&self.kondisi_rumah),
            kebutuhan_mendesak: optional_list(&self.kebutuhan_mendesak),
            hobi_minat: optional(&self.hobi_minat),
            kondisi_psikologis: optional(&self.kondisi_psikologis),
        }
    }

    fn companion(&self) -> Result<CompanionData, FormError> {
        Ok(CompanionData {
            nama_pendamping: optional(&self.nama_pendamping),
            hubungan_dengan_lansia: optional(&self.hubungan_dengan_lansia),
            tanggal_lahir_pendamping: optional_date(
                &self.tanggal_lahir_pendamping,
                "tanggal_lahir_pendamping",
            )?,
            usia: None,
            pendidikan_pendamping: optional(&self.pendidikan_pendamping),
            ketersediaan_waktu: optional(&self.ketersediaan_waktu),
            partisipasi_program_bkl: optional(&self.partisipasi_program_bkl),
            riwayat_partisipasi_bkl: optional(&self.riwayat_partisipasi_bkl),
            keterlibatan_data: optional(&self.keterlibatan_data),
        })
    }

    /// Builds the body for creating a record. Only name, NIK and gender are
    /// mandatory.
    pub fn to_new_lansia(&self) -> Result<NewLansia, FormError> {
        let (name, nik, gender) = self.checked_identity()?;

        let personal = PersonalData {
            nama_lengkap: name.into_inner(),
            nik: nik.into_inner(),
            jenis_kelamin: gender.into_inner(),
            tanggal_lahir: optional_date(&self.tanggal_lahir, "tanggal_lahir")?,
            alamat_lengkap: optional(&self.alamat_lengkap),
            koordinat: optional(&self.koordinat),
            rt: optional(&self.rt),
            rw: optional(&self.rw),
            status_perkawinan: optional(&self.status_perkawinan),
            agama: optional(&self.agama),
            pendidikan_terakhir: optional(&self.pendidikan_terakhir),
            pekerjaan_terakhir: optional(&self.pekerjaan_terakhir),
            sumber_penghasilan: optional(&self.sumber_penghasilan),
        };

        Ok(NewLansia {
            personal,
            kesehatan: self.health(),
            kesejahteraan: self.welfare(),
            keluarga: self.companion()?,
            daily_living: self.daily_living.clone(),
        })
    }

    /// Builds the body for updating a record. The backend refuses `null` at
    /// the top level, so the birth date is mandatory and blank text fields are
    /// sent as empty strings.
    pub fn to_update_lansia(&self) -> Result<UpdateLansia, FormError> {
        let (name, nik, gender) = self.checked_identity()?;

        let tanggal_lahir = optional_date(&self.tanggal_lahir, "tanggal_lahir")?
            .ok_or(FormError::MissingField("tanggal_lahir"))?;
        let blank_as_empty = |value: &str| Some(value.trim().to_string());

        let personal = PersonalData {
            nama_lengkap: name.into_inner(),
            nik: nik.into_inner(),
            jenis_kelamin: gender.into_inner(),
            tanggal_lahir: Some(tanggal_lahir),
            alamat_lengkap: blank_as_empty(&self.alamat_lengkap),
            koordinat: blank_as_empty(&self.koordinat),
            rt: blank_as_empty(&self.rt),
            rw: blank_as_empty(&self.rw),
            status_perkawinan: blank_as_empty(&self.status_perkawinan),
            agama: blank_as_empty(&self.agama),
            pendidikan_terakhir: blank_as_empty(&self.pendidikan_terakhir),
            pekerjaan_terakhir: blank_as_empty(&self.pekerjaan_terakhir),
            sumber_penghasilan: blank_as_empty(&self.sumber_penghasilan),
        };

        Ok(UpdateLansia {
            personal,
            kesehatan: self.health(),
            kesejahteraan: self.welfare(),
            keluarga: self.companion()?,
        })
    }
}
