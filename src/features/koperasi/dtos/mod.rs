mod koperasi_dto;

pub use koperasi_dto::{
    KoperasiFilterQuery, KoperasiListQuery, KoperasiPetaQuery, KoperasiResponseDto,
    SaveKoperasiDto, ToggleStatusDto,
};
