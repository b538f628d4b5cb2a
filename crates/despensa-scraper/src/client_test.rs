use super::*;

#[test]
fn endpoint_url_appends_trailing_slash() {
    let url = CatalogClient::endpoint_url("https://tienda.mercadona.es/api", "categories", &[])
        .unwrap();
    assert_eq!(url, "https://tienda.mercadona.es/api/categories/");
}

#[test]
fn endpoint_url_collapses_duplicate_slashes() {
    let url =
        CatalogClient::endpoint_url("https://tienda.mercadona.es/api/", "/categories/112", &[])
            .unwrap();
    assert_eq!(url, "https://tienda.mercadona.es/api/categories/112/");
}

#[test]
fn endpoint_url_encodes_query_in_order() {
    let url = CatalogClient::endpoint_url(
        "https://tienda.mercadona.es/api",
        "categories",
        &[("lang", "es".to_string()), ("wh", "vlc1".to_string())],
    )
    .unwrap();
    assert_eq!(url, "https://tienda.mercadona.es/api/categories/?lang=es&wh=vlc1");
}

#[test]
fn endpoint_url_keeps_nested_base_path() {
    let url = CatalogClient::endpoint_url(
        "https://tienda.consum.es/api/rest/V1.0",
        "shopping/category/menu",
        &[],
    )
    .unwrap();
    assert_eq!(
        url,
        "https://tienda.consum.es/api/rest/V1.0/shopping/category/menu/"
    );
}

#[test]
fn endpoint_url_rejects_invalid_base() {
    let err = CatalogClient::endpoint_url("not-a-url", "categories", &[]).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}
