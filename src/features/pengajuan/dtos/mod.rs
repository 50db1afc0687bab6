mod pengajuan_dto;

pub use pengajuan_dto::{
    content_type_from_url, DokumenDto, PengajuanDetailDto, PengajuanFilterQuery,
    PengajuanListQuery, PengajuanResponseDto, SubmitPengajuanDto, UpdateStatusDto,
};
