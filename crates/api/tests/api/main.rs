mod climate_data;
